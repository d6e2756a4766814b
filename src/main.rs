// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use suggestomatic::corpus::prepare::{default_output_dir, prepare, PrepareReport};
use suggestomatic::filter::DEFAULT_FILTER_THRESHOLD;
use suggestomatic::progress::LogProgress;
#[cfg(feature = "parallel")]
use suggestomatic::progress::BarProgress;
use suggestomatic::{
    CancellationToken, CorpusPaths, EngineError, RunConfig, RunReport, Scheduler, SetStore,
};

mod cli;
use cli::display::{
    dim_value, field, format_count, format_duration, format_size, problem_count, row,
    section_bot, section_mid, section_top, status_badge,
};
use cli::{Cli, Commands, ProgressArg, SuggestArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::Suggest(args) => run_suggest(&args),
        Commands::Inspect {
            set_ids,
            set_index,
            set_members,
            check,
        } => run_inspect(&CorpusPaths::new(set_ids, set_index, set_members), check),
        Commands::Prepare {
            membership_csv,
            output_dir,
            small_set_threshold,
        } => run_prepare(&membership_csv, output_dir.as_deref(), small_set_threshold),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for summaries. `RUST_LOG` wins
/// over `-v`; with progress bars on, info lines are held back unless asked
/// for so they don't tear the bars.
fn init_logging(cli: &Cli) {
    let bars = matches!(
        &cli.command,
        Commands::Suggest(args) if args.progress == ProgressArg::Bar
    );
    let level = match (cli.verbose, bars) {
        (0, true) => "warn",
        (0, false) => "info",
        (1, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("suggestomatic={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_suggest(args: &SuggestArgs) -> Result<bool, EngineError> {
    let base = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    let config = args.apply(base);
    config.validate()?;

    let paths = CorpusPaths::new(
        args.set_ids.clone(),
        args.set_index.clone(),
        args.set_members.clone(),
    );
    let store = SetStore::open(&paths)?;
    tracing::info!(fingerprint = %store.fingerprint(), "corpus fingerprint");

    let cancel = CancellationToken::new();
    if let Some(secs) = args.time_limit {
        cancel.cancel_after(Duration::from_secs(secs));
    }
    let scheduler = Scheduler::new(&store, &config).with_cancellation(cancel);

    let report = match args.progress {
        ProgressArg::None => scheduler.run(&args.output)?,
        ProgressArg::Log => {
            let reporter = LogProgress::default();
            scheduler.with_reporter(&reporter).run(&args.output)?
        }
        #[cfg(feature = "parallel")]
        ProgressArg::Bar => {
            let reporter = BarProgress::new(&scheduler.shares());
            scheduler.with_reporter(&reporter).run(&args.output)?
        }
        #[cfg(not(feature = "parallel"))]
        ProgressArg::Bar => {
            let reporter = LogProgress::default();
            scheduler.with_reporter(&reporter).run(&args.output)?
        }
    };

    print_run_summary(&config, &report);
    for failed in report.failed() {
        if let Some(error) = &failed.error {
            eprintln!("❌ worker {}: {}", failed.worker, error);
        }
    }
    Ok(report.is_success())
}

fn print_run_summary(config: &RunConfig, report: &RunReport) {
    section_top("Run");
    field("mode", config.mode.as_str());
    field("threshold", &config.threshold.to_string());
    field("workers", &config.workers.to_string());
    field("begin at", &format_count(config.begin_at));
    field(
        "anchors processed",
        &format_count(report.anchors_processed()),
    );
    field("anchors skipped", &problem_count(report.anchors_skipped()));
    field(
        "suggestions written",
        &format_count(report.suggestions_written()),
    );
    field("elapsed", &dim_value(&format_duration(report.elapsed)));

    section_mid("Workers");
    for worker in &report.workers {
        row(&format!(
            " {:>3}  {:<8} {:>12} anchors {:>14} rows  {}",
            worker.worker,
            status_badge(worker.is_success(), worker.cancelled),
            format_count(worker.anchors_processed),
            format_count(worker.suggestions_written),
            worker.output.display()
        ));
    }
    section_bot();
}

fn run_inspect(paths: &CorpusPaths, check: usize) -> Result<bool, EngineError> {
    let store = SetStore::open(paths)?;
    let stats = store.stats(DEFAULT_FILTER_THRESHOLD);
    let unsorted = store.unsorted_sets(check);

    section_top("Corpus");
    field("sets", &format_count(stats.sets));
    field("index entries", &format_count(stats.index_entries));
    field(
        "members blob",
        &format_size(stats.blob_words * suggestomatic::corpus::WORD_BYTES),
    );
    field("fingerprint", &dim_value(&store.fingerprint().to_string()));

    section_mid("Set sizes");
    field("min", &format_count(stats.min_len));
    field("max", &format_count(stats.max_len));
    field("mean", &format!("{:.1}", stats.mean_len));
    field("empty", &format_count(stats.empty));
    field(
        &format!("over {} (filtered)", format_count(DEFAULT_FILTER_THRESHOLD)),
        &format_count(stats.oversized),
    );

    section_mid("Sample");
    field("first ids", &preview(store.set_ids()));
    if let Ok(first) = store.resolve(0) {
        field(&format!("set {} members", first.id), &preview(first.members));
    }

    section_mid("Checks");
    field("unresolvable sets", &problem_count(stats.unresolvable));
    field(
        &format!("unsorted (first {})", format_count(check)),
        &problem_count(unsorted.len()),
    );
    for set_id in unsorted.iter().take(10) {
        row(&format!("   set {}", set_id));
    }
    section_bot();

    Ok(unsorted.is_empty())
}

/// Up to ten words, comma separated, with an ellipsis when there are more.
fn preview(words: &[u32]) -> String {
    let shown: Vec<String> = words.iter().take(10).map(u32::to_string).collect();
    let more = if words.len() > 10 { ", …" } else { "" };
    format!("{}{}", shown.join(", "), more)
}

fn run_prepare(
    csv: &Path,
    output_dir: Option<&Path>,
    small_set_threshold: usize,
) -> Result<bool, EngineError> {
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(csv));
    let report = prepare(csv, &output_dir, small_set_threshold)?;
    print_prepare_summary(&report);
    Ok(true)
}

fn print_prepare_summary(report: &PrepareReport) {
    section_top("Prepare");
    field("csv lines", &format_count(report.lines));
    field("sets seen", &format_count(report.sets_seen));
    field("sets kept", &format_count(report.sets_kept));
    field("sets dropped", &format_count(report.sets_dropped));
    field(
        "member 0 lines dropped",
        &problem_count(report.zero_members_dropped),
    );
    field("members written", &format_count(report.members_written));
    section_mid("Files");
    for path in [
        &report.paths.set_ids,
        &report.paths.set_index,
        &report.paths.set_members,
    ] {
        row(&format!(" {}", path.display()));
    }
    section_bot();
}
