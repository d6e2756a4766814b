// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the suggestomatic command-line interface.
//!
//! Three subcommands: `suggest` runs a scoring pass over a prepared corpus,
//! `inspect` summarizes and sanity-checks the three corpus files, and
//! `prepare` turns a `member_id,set_id` CSV into those files.

pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use suggestomatic::corpus::prepare::DEFAULT_SMALL_SET_THRESHOLD;
use suggestomatic::engine::Partition;
use suggestomatic::scoring::{CompareWindow, ScanOrder, ScoreMode, Selection};
use suggestomatic::RunConfig;

const DEFAULT_WINDOW_WIDTH: usize = 1000;

#[derive(Parser)]
#[command(
    name = "suggestomatic",
    about = "Set-overlap suggestions over a memory-mapped corpus",
    version
)]
pub struct Cli {
    /// Verbose logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every anchor set against its window and write suggestions
    Suggest(SuggestArgs),

    /// Summarize a corpus and check that it resolves
    Inspect {
        /// Set id list (set-ids.bin)
        set_ids: PathBuf,

        /// Offset index (set-index.bin)
        set_index: PathBuf,

        /// Members blob (set-members.bin)
        set_members: PathBuf,

        /// Check sortedness of the first N resolvable sets
        #[arg(long, default_value = "1000")]
        check: usize,
    },

    /// Convert a member_id,set_id CSV into corpus files
    Prepare {
        /// Membership CSV, one `member_id,set_id` pair per line
        #[arg(long)]
        membership_csv: PathBuf,

        /// Where to write the three .bin files (default: <csv stem>-corpus)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Sets with this many members or fewer are dropped
        #[arg(long, default_value_t = DEFAULT_SMALL_SET_THRESHOLD)]
        small_set_threshold: usize,
    },
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Set id list (set-ids.bin)
    pub set_ids: PathBuf,

    /// Offset index (set-index.bin)
    pub set_index: PathBuf,

    /// Members blob (set-members.bin)
    pub set_members: PathBuf,

    /// Output CSV; with several workers each gets <stem>-<worker>.<ext>
    pub output: PathBuf,

    /// JSON file with run settings; flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Score as a raw overlap count or as overlap / anchor size
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Absolute: count must exceed this. Fraction: score must reach it.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// First anchor index to process (resume point)
    #[arg(long)]
    pub begin_at: Option<usize>,

    /// Number of worker threads, each with its own output file
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Keep the best N per anchor, or stop at the first M accepted
    #[arg(long, value_enum)]
    pub selection: Option<SelectionArg>,

    /// N for top-n selection
    #[arg(long)]
    pub top_n: Option<usize>,

    /// M for early-exit selection
    #[arg(long)]
    pub max_accepted: Option<usize>,

    /// Which other sets each anchor is compared with
    #[arg(long, value_enum)]
    pub window: Option<WindowArg>,

    /// Width for the windowed compare
    #[arg(long)]
    pub window_width: Option<usize>,

    /// Scan candidates in list order or from a seeded random start
    #[arg(long, value_enum)]
    pub scan_order: Option<ScanOrderArg>,

    /// Seed for randomized-start scanning
    #[arg(long)]
    pub seed: Option<u64>,

    /// Anchors above this many members use the bloom filter
    #[arg(long)]
    pub filter_threshold: Option<usize>,

    /// Bloom filter size in bits
    #[arg(long)]
    pub filter_bits: Option<usize>,

    /// How anchors are split between workers
    #[arg(long, value_enum)]
    pub partition: Option<PartitionArg>,

    /// Progress display
    #[arg(long, value_enum, default_value = "bar")]
    pub progress: ProgressArg,

    /// Stop cleanly after this many seconds
    #[arg(long)]
    pub time_limit: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Absolute,
    Fraction,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SelectionArg {
    TopN,
    EarlyExit,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Following,
    AllExceptSelf,
    Windowed,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScanOrderArg {
    Sequential,
    RandomizedStart,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PartitionArg {
    Interleaved,
    Contiguous,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressArg {
    Bar,
    Log,
    None,
}

impl SuggestArgs {
    /// Layer these flags over `base` (defaults or a config file).
    pub fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(mode) = self.mode {
            config.mode = match mode {
                ModeArg::Absolute => ScoreMode::Absolute,
                ModeArg::Fraction => ScoreMode::Fraction,
            };
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(begin_at) = self.begin_at {
            config.begin_at = begin_at;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        // Sizes alone adjust the current policy; naming a policy switches it.
        config.selection = match (self.selection, config.selection) {
            (Some(SelectionArg::TopN), Selection::TopN { n }) | (None, Selection::TopN { n }) => {
                Selection::TopN {
                    n: self.top_n.unwrap_or(n),
                }
            }
            (Some(SelectionArg::TopN), Selection::EarlyExit { .. }) => Selection::TopN {
                n: self.top_n.unwrap_or(suggestomatic::scoring::DEFAULT_TOP_N),
            },
            (Some(SelectionArg::EarlyExit), Selection::EarlyExit { max_accepted })
            | (None, Selection::EarlyExit { max_accepted }) => Selection::EarlyExit {
                max_accepted: self.max_accepted.unwrap_or(max_accepted),
            },
            (Some(SelectionArg::EarlyExit), Selection::TopN { .. }) => Selection::EarlyExit {
                max_accepted: self
                    .max_accepted
                    .unwrap_or(suggestomatic::scoring::DEFAULT_MAX_ACCEPTED),
            },
        };

        config.window = match (self.window, config.window) {
            (Some(WindowArg::Following), _) => CompareWindow::Following,
            (Some(WindowArg::AllExceptSelf), _) => CompareWindow::AllExceptSelf,
            (Some(WindowArg::Windowed), CompareWindow::Windowed { width })
            | (None, CompareWindow::Windowed { width }) => CompareWindow::Windowed {
                width: self.window_width.unwrap_or(width),
            },
            (Some(WindowArg::Windowed), _) => CompareWindow::Windowed {
                width: self.window_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
            },
            (None, window) => window,
        };

        config.scan_order = match (self.scan_order, config.scan_order) {
            (Some(ScanOrderArg::Sequential), _) => ScanOrder::Sequential,
            (Some(ScanOrderArg::RandomizedStart), ScanOrder::RandomizedStart { seed })
            | (None, ScanOrder::RandomizedStart { seed }) => ScanOrder::RandomizedStart {
                seed: self.seed.unwrap_or(seed),
            },
            (Some(ScanOrderArg::RandomizedStart), ScanOrder::Sequential) => {
                ScanOrder::RandomizedStart {
                    seed: self.seed.unwrap_or(0),
                }
            }
            (None, order) => order,
        };

        if let Some(threshold) = self.filter_threshold {
            config.filter_threshold = threshold;
        }
        if let Some(bits) = self.filter_bits {
            config.filter_bits = bits;
        }
        if let Some(partition) = self.partition {
            config.partition = match partition {
                PartitionArg::Interleaved => Partition::Interleaved,
                PartitionArg::Contiguous => Partition::Contiguous,
            };
        }
        config
    }
}
