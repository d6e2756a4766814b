//! Custom cargo commands for suggestomatic.
//!
//! Usage:
//!   cargo xtask test      - Run all tests (default and sequential builds)
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask bench     - Run benchmarks
//!   cargo xtask sample    - Write a synthetic membership CSV

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        Some("sample") => sample(&args[1..])?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  test      Run all Rust tests, with and without the `parallel` feature
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
  sample    Write a synthetic membership CSV
            sample <OUT.csv> [SETS] [UNIVERSE] [SEED]
"#
    );
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])?;
    run_cargo(&["test", "--no-default-features"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

/// Synthetic membership data for local runs.
///
/// Set sizes fall off with set id, so the first handful of sets are large
/// enough to take the approximate path and the long tail is small.
fn sample(args: &[String]) -> Result<()> {
    let Some(out) = args.first() else {
        bail!("usage: cargo xtask sample <OUT.csv> [SETS] [UNIVERSE] [SEED]");
    };
    let sets: u32 = parse_arg(args, 1, 2_000)?;
    let universe: u32 = parse_arg(args, 2, 100_000)?;
    let seed: u64 = parse_arg(args, 3, 42)?;
    if sets == 0 || universe == 0 {
        bail!("SETS and UNIVERSE must be positive");
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let file = File::create(out).with_context(|| format!("Failed to create {}", out))?;
    let mut writer = BufWriter::new(file);

    let mut rows = 0u64;
    for set_id in 1..=sets {
        let size = (universe / set_id).clamp(2, 50_000);
        for _ in 0..size {
            let member = rng.gen_range(1..=universe);
            writeln!(writer, "{},{}", member, set_id)?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("✓ Wrote {} rows across {} sets to {}", rows, sets, out);
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn parse_arg<T: std::str::FromStr>(args: &[String], pos: usize, default: T) -> Result<T> {
    match args.get(pos) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid argument {:?}", raw)),
        None => Ok(default),
    }
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
