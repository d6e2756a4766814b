//! The `suggestomatic` binary, driven as a user would.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use crate::common::{membership_csv, THREE_SETS};

fn suggestomatic(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_suggestomatic"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run suggestomatic")
}

fn prepared_corpus(dir: &Path) -> [String; 3] {
    let csv = dir.join("membership.csv");
    fs::write(&csv, membership_csv(THREE_SETS)).unwrap();
    let corpus = dir.join("corpus");
    let out = suggestomatic(&[
        "prepare",
        "--membership-csv",
        csv.to_str().unwrap(),
        "--output-dir",
        corpus.to_str().unwrap(),
        "--small-set-threshold",
        "0",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    ["set-ids.bin", "set-index.bin", "set-members.bin"]
        .map(|name| corpus.join(name).to_string_lossy().into_owned())
}

#[test]
fn test_prepare_then_suggest_via_cli() {
    let dir = tempfile::tempdir().unwrap();
    let [ids, index, members] = prepared_corpus(dir.path());
    let output = dir.path().join("suggestions.csv");

    let out = suggestomatic(&[
        "suggest",
        &ids,
        &index,
        &members,
        output.to_str().unwrap(),
        "--workers",
        "1",
        "--progress",
        "none",
    ]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(&output).unwrap(), "1,2,2\n");
    assert!(String::from_utf8_lossy(&out.stdout).contains("suggestions written"));
}

#[test]
fn test_inspect_reports_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let [ids, index, members] = prepared_corpus(dir.path());

    let out = suggestomatic(&["inspect", &ids, &index, &members]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("sets"));
    assert!(stdout.contains("fingerprint"));
}

#[test]
fn test_missing_corpus_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.bin");
    let missing = missing.to_str().unwrap();
    let output = dir.path().join("out.csv");

    let out = suggestomatic(&[
        "suggest",
        missing,
        missing,
        missing,
        output.to_str().unwrap(),
        "--progress",
        "none",
    ]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot open corpus file"));
}

#[test]
fn test_invalid_flags_exit_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let [ids, index, members] = prepared_corpus(dir.path());
    let output = dir.path().join("out.csv");

    let out = suggestomatic(&[
        "suggest",
        &ids,
        &index,
        &members,
        output.to_str().unwrap(),
        "--mode",
        "fraction",
        "--threshold",
        "1.5",
        "--progress",
        "none",
    ]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid configuration"));
    assert!(!output.exists());
}
