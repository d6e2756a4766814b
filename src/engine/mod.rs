// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Running a whole suggestion pass over the corpus.
//!
//! The anchor range `[begin_at, set_count)` is split into one [`Share`] per
//! worker. Each worker owns its output file and its selection state; the only
//! thing shared is the read-only [`SetStore`]. Rayon provides the worker
//! threads when the `parallel` feature is on, otherwise shares run one after
//! another on the calling thread.
//!
//! A worker that hits a fatal error stops and reports it. Its siblings keep
//! going; the run as a whole is marked failed in the [`RunReport`].

mod anchor;
mod cancel;
mod partition;

pub use anchor::{AnchorOutcome, AnchorProcessor, ComparePath};
pub use cancel::CancellationToken;
pub use partition::{assign, Partition, Share};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::corpus::SetStore;
use crate::error::EngineError;
use crate::progress::{AnchorProgress, NoProgress, ProgressReporter};
use crate::sink::{worker_output_path, ResultSink};

/// Outcome of one worker.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker: usize,
    pub output: PathBuf,
    pub anchors_assigned: usize,
    pub anchors_processed: usize,
    /// Anchors whose own membership range was unresolvable.
    pub anchors_skipped: usize,
    pub candidates_skipped: usize,
    pub suggestions_written: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
    pub error: Option<EngineError>,
}

impl WorkerReport {
    fn new(share: &Share, output: PathBuf) -> Self {
        Self {
            worker: share.worker,
            output,
            anchors_assigned: share.len(),
            anchors_processed: 0,
            anchors_skipped: 0,
            candidates_skipped: 0,
            suggestions_written: 0,
            cancelled: false,
            elapsed: Duration::ZERO,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole run, one entry per worker in worker order.
#[derive(Debug)]
pub struct RunReport {
    pub workers: Vec<WorkerReport>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.workers.iter().all(WorkerReport::is_success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|w| !w.is_success())
    }

    pub fn was_cancelled(&self) -> bool {
        self.workers.iter().any(|w| w.cancelled)
    }

    pub fn anchors_processed(&self) -> usize {
        self.workers.iter().map(|w| w.anchors_processed).sum()
    }

    pub fn anchors_skipped(&self) -> usize {
        self.workers.iter().map(|w| w.anchors_skipped).sum()
    }

    pub fn suggestions_written(&self) -> usize {
        self.workers.iter().map(|w| w.suggestions_written).sum()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.workers.iter().map(|w| w.output.as_path())
    }
}

/// Drives workers over a store with a fixed configuration.
pub struct Scheduler<'a> {
    store: &'a SetStore,
    config: &'a RunConfig,
    reporter: &'a dyn ProgressReporter,
    cancel: CancellationToken,
}

impl<'a> Scheduler<'a> {
    pub fn new(store: &'a SetStore, config: &'a RunConfig) -> Self {
        Self {
            store,
            config,
            reporter: &NoProgress,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Shares this scheduler will hand out, in worker order.
    pub fn shares(&self) -> Vec<Share> {
        assign(
            self.config.partition,
            self.config.begin_at,
            self.store.set_count(),
            self.config.workers,
        )
    }

    /// Process every assigned anchor, writing to `output` (one file per
    /// worker when there is more than one).
    ///
    /// Only configuration and thread-pool problems fail the call itself.
    /// Per-worker failures are in the returned report.
    pub fn run(&self, output: &Path) -> Result<RunReport, EngineError> {
        self.config.validate()?;
        let started = Instant::now();
        let shares = self.shares();

        if self.config.begin_at >= self.store.set_count() {
            tracing::warn!(
                begin_at = self.config.begin_at,
                sets = self.store.set_count(),
                "begin_at is past the last set, nothing to do"
            );
        }
        tracing::info!(
            workers = shares.len(),
            begin_at = self.config.begin_at,
            sets = self.store.set_count(),
            mode = self.config.mode.as_str(),
            threshold = self.config.threshold,
            "starting run"
        );

        let workers = self.run_shares(&shares, output)?;
        let report = RunReport {
            workers,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            processed = report.anchors_processed(),
            skipped = report.anchors_skipped(),
            written = report.suggestions_written(),
            failed = report.failed().count(),
            elapsed_secs = report.elapsed.as_secs_f64(),
            "run finished"
        );
        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn run_shares(&self, shares: &[Share], output: &Path) -> Result<Vec<WorkerReport>, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(shares.len())
            .thread_name(|i| format!("suggest-worker-{}", i))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| {
            shares
                .par_iter()
                .with_max_len(1)
                .map(|share| self.run_worker(share, output))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_shares(&self, shares: &[Share], output: &Path) -> Result<Vec<WorkerReport>, EngineError> {
        Ok(shares
            .iter()
            .map(|share| self.run_worker(share, output))
            .collect())
    }

    fn run_worker(&self, share: &Share, output: &Path) -> WorkerReport {
        let path = worker_output_path(output, share.worker, self.config.workers);
        let mut report = WorkerReport::new(share, path);
        let started = Instant::now();

        self.reporter.worker_started(share);
        if let Err(e) = self.scan_share(share, started, &mut report) {
            tracing::error!(worker = share.worker, error = %e, "worker stopped");
            report.error = Some(e);
        }
        report.elapsed = started.elapsed();
        self.reporter.worker_done(&report);
        report
    }

    fn scan_share(
        &self,
        share: &Share,
        started: Instant,
        report: &mut WorkerReport,
    ) -> Result<(), EngineError> {
        let mut sink = ResultSink::create(&report.output)?;
        let processor = AnchorProcessor::new(self.store, self.config);

        for anchor in share.indices() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                tracing::info!(worker = share.worker, next_anchor = anchor, "cancelled");
                break;
            }

            match processor.process(anchor, &mut sink) {
                Ok(outcome) => {
                    report.anchors_processed += 1;
                    report.candidates_skipped += outcome.candidates_skipped;
                    report.suggestions_written += outcome.written;
                    self.reporter.anchor_done(
                        share.worker,
                        &AnchorProgress {
                            anchor_id: outcome.anchor_id,
                            anchor_len: outcome.anchor_len,
                            accepted: outcome.accepted,
                            written: outcome.written,
                            path: outcome.path,
                            processed: report.anchors_processed,
                            elapsed: started.elapsed(),
                        },
                    );
                }
                Err(EngineError::Corpus(e)) if e.is_skippable() => {
                    tracing::warn!(worker = share.worker, anchor, error = %e, "skipping anchor");
                    report.anchors_skipped += 1;
                    self.reporter.anchor_skipped(share.worker, anchor);
                }
                Err(e) => return Err(e),
            }
        }

        sink.finish()?;
        Ok(())
    }
}
