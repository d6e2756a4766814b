// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Set-similarity suggestions over a memory-mapped corpus.
//!
//! Given a large collection of sets (each a sorted list of member ids), every
//! set in turn becomes the *anchor* and is scored against a window of other
//! sets by overlap. Pairs that clear a threshold are written as
//! `anchor_id,candidate_id,score` lines.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  corpus      │────▶│  engine      │────▶│  sink        │
//! │ (SetStore,   │     │ (Scheduler,  │     │ (ResultSink, │
//! │  prepare)    │     │  partition)  │     │  one / worker│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!          ┌──────────────────┼──────────────────┐
//!          ▼                  ▼                  ▼
//!   ┌────────────┐     ┌────────────┐     ┌────────────┐
//!   │ intersect  │     │  filter    │     │  scoring   │
//!   │ (exact     │     │ (bloom for │     │ (mode,     │
//!   │  merge)    │     │  big sets) │     │  selection)│
//!   └────────────┘     └────────────┘     └────────────┘
//! ```
//!
//! # Corpus layout
//!
//! Three flat files of native-endian `u32` words:
//!
//! | File              | Contents                                         |
//! |-------------------|--------------------------------------------------|
//! | `set-ids.bin`     | Set ids in processing order                      |
//! | `set-index.bin`   | Byte offset into the members blob, by set id     |
//! | `set-members.bin` | Ascending member ids, sets back to back          |
//!
//! A set's members run from its own offset to the offset of the *next set in
//! the id list*. Zero is never a member; trailing zero words are padding.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use suggestomatic::{CorpusPaths, RunConfig, Scheduler, SetStore};
//!
//! let store = SetStore::open(&CorpusPaths::in_dir(Path::new("corpus")))?;
//! let config = RunConfig { workers: 4, ..RunConfig::default() };
//! let report = Scheduler::new(&store, &config).run(Path::new("suggestions.csv"))?;
//! println!("{} suggestions", report.suggestions_written());
//! # Ok::<(), suggestomatic::EngineError>(())
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod filter;
mod intersect;
pub mod progress;
pub mod scoring;
pub mod sink;
pub mod testing;

pub use config::RunConfig;
pub use corpus::{CorpusPaths, SetStore, SetView};
pub use engine::{CancellationToken, Partition, RunReport, Scheduler, WorkerReport};
pub use error::{CorpusError, EngineError};
pub use filter::ApproxFilter;
pub use intersect::intersect;
pub use scoring::{
    CompareWindow, ScanOrder, Score, ScoreMode, ScoringPolicy, Selection, Suggestion,
};
pub use sink::{RecordSink, ResultSink};
