// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Progress reporting for long runs.
//!
//! Workers call into a shared [`ProgressReporter`] after every anchor,
//! skipped ones included. The reporter never influences what gets written;
//! it only observes.
//!
//! - [`NoProgress`]: silent, used by tests and library callers.
//! - [`LogProgress`]: a `tracing` event every N anchors per worker.
//! - `BarProgress`: one indicatif bar per worker (`parallel` feature).

use std::time::Duration;

#[cfg(feature = "parallel")]
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::engine::{ComparePath, Share, WorkerReport};

/// What a worker reports after finishing one anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorProgress {
    pub anchor_id: u32,
    pub anchor_len: usize,
    pub accepted: usize,
    pub written: usize,
    pub path: ComparePath,
    /// Anchors this worker has finished so far, including this one.
    pub processed: usize,
    /// Time since the worker started.
    pub elapsed: Duration,
}

pub trait ProgressReporter: Send + Sync {
    fn worker_started(&self, _share: &Share) {}

    fn anchor_done(&self, worker: usize, progress: &AnchorProgress);

    /// `anchor` (a list index) could not be resolved and was stepped over.
    fn anchor_skipped(&self, _worker: usize, _anchor: usize) {}

    fn worker_done(&self, _report: &WorkerReport) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn anchor_done(&self, _worker: usize, _progress: &AnchorProgress) {}
}

/// Emits an info event every `every` anchors of each worker.
#[derive(Clone, Copy, Debug)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressReporter for LogProgress {
    fn worker_started(&self, share: &Share) {
        tracing::debug!(worker = share.worker, anchors = share.len(), "worker started");
    }

    fn anchor_done(&self, worker: usize, progress: &AnchorProgress) {
        if progress.processed % self.every != 0 {
            return;
        }
        tracing::info!(
            worker,
            anchor_id = progress.anchor_id,
            anchor_len = progress.anchor_len,
            accepted = progress.accepted,
            processed = progress.processed,
            elapsed_secs = progress.elapsed.as_secs_f64(),
            "anchor done"
        );
    }

    fn worker_done(&self, report: &WorkerReport) {
        match &report.error {
            None => tracing::info!(
                worker = report.worker,
                processed = report.anchors_processed,
                skipped = report.anchors_skipped,
                written = report.suggestions_written,
                output = %report.output.display(),
                "worker finished"
            ),
            Some(error) => tracing::error!(
                worker = report.worker,
                processed = report.anchors_processed,
                error = %error,
                "worker failed"
            ),
        }
    }
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// One terminal bar per worker.
#[cfg(feature = "parallel")]
pub struct BarProgress {
    // Owns the draw target; the bars render through it.
    _multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

#[cfg(feature = "parallel")]
impl BarProgress {
    pub fn new(shares: &[Share]) -> Self {
        let multi = MultiProgress::new();
        let bars = shares
            .iter()
            .map(|share| {
                let bar = multi.add(ProgressBar::new(share.len() as u64));
                bar.set_style(create_progress_style());
                bar.set_prefix(format!("worker {}", share.worker));
                bar.set_message("waiting...");
                bar
            })
            .collect();
        Self { _multi: multi, bars }
    }
}

#[cfg(feature = "parallel")]
impl ProgressReporter for BarProgress {
    fn anchor_done(&self, worker: usize, progress: &AnchorProgress) {
        if let Some(bar) = self.bars.get(worker) {
            bar.inc(1);
            bar.set_message(format!(
                "set {} ({} members, {} accepted)",
                progress.anchor_id, progress.anchor_len, progress.accepted
            ));
        }
    }

    fn anchor_skipped(&self, worker: usize, anchor: usize) {
        if let Some(bar) = self.bars.get(worker) {
            bar.inc(1);
            bar.set_message(format!("skipped anchor {}", anchor));
        }
    }

    fn worker_done(&self, report: &WorkerReport) {
        if let Some(bar) = self.bars.get(report.worker) {
            match &report.error {
                None if report.cancelled => bar.abandon_with_message(format!(
                    "stopped, {} suggestions",
                    report.suggestions_written
                )),
                None => bar.finish_with_message(format!(
                    "{} suggestions",
                    report.suggestions_written
                )),
                Some(error) => bar.abandon_with_message(format!("failed: {}", error)),
            }
        }
    }
}
