// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring one anchor against its candidate window.
//!
//! ```text
//! resolve anchor ──▶ empty? ──▶ done (nothing written)
//!        │
//!        ▼
//! len > filter_threshold? ──▶ build ApproxFilter once
//!        │
//!        ▼
//! for candidate in window (scan order):
//!     resolve ──▶ out of range? skip, count
//!     overlap  = filter hits (clamped) | exact merge
//!     score    = policy.score(overlap, |anchor|)
//!     accepted? ──▶ selector.offer ──▶ Stop? break
//!        │
//!        ▼
//! selector.finish (top-N sorts and writes here)
//! ```

use crate::config::RunConfig;
use crate::corpus::SetStore;
use crate::error::EngineError;
use crate::filter::ApproxFilter;
use crate::intersect::intersect;
use crate::scoring::{candidates, Offer, ScoringPolicy, Suggestion};
use crate::sink::RecordSink;

/// How overlaps were computed for an anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComparePath {
    #[default]
    Exact,
    Approximate,
}

/// What happened while processing one anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnchorOutcome {
    pub anchor_id: u32,
    pub anchor_len: usize,
    pub path: ComparePath,
    pub candidates_scanned: usize,
    /// Candidates whose membership range fell outside the blob.
    pub candidates_skipped: usize,
    pub accepted: usize,
    pub written: usize,
    pub stopped_early: bool,
}

/// Stateless per-anchor driver. One per worker; shares the store.
pub struct AnchorProcessor<'a> {
    store: &'a SetStore,
    config: &'a RunConfig,
    policy: ScoringPolicy,
}

impl<'a> AnchorProcessor<'a> {
    pub fn new(store: &'a SetStore, config: &'a RunConfig) -> Self {
        Self {
            store,
            config,
            policy: config.policy(),
        }
    }

    /// Score `anchor` against its window and write accepted pairs to `sink`.
    ///
    /// An anchor whose own range is unresolvable comes back as a skippable
    /// [`EngineError::Corpus`]; the caller decides to move on.
    pub fn process<S: RecordSink + ?Sized>(
        &self,
        anchor: usize,
        sink: &mut S,
    ) -> Result<AnchorOutcome, EngineError> {
        let anchor_set = self.store.resolve(anchor)?;
        let mut outcome = AnchorOutcome {
            anchor_id: anchor_set.id,
            anchor_len: anchor_set.len(),
            ..AnchorOutcome::default()
        };
        if anchor_set.is_empty() {
            tracing::debug!(anchor_id = anchor_set.id, "empty anchor, nothing to compare");
            return Ok(outcome);
        }

        let filter = (anchor_set.len() > self.config.filter_threshold).then(|| {
            tracing::debug!(
                anchor_id = anchor_set.id,
                members = anchor_set.len(),
                "oversized anchor, using approximate filter"
            );
            ApproxFilter::from_members(anchor_set.members, self.config.filter_bits)
        });
        if filter.is_some() {
            outcome.path = ComparePath::Approximate;
        }

        let mut selector = self.config.selection.selector();
        let window = candidates(
            self.config.window,
            self.config.scan_order,
            anchor,
            self.store.set_count(),
        );

        for candidate in window {
            let candidate_set = match self.store.resolve(candidate) {
                Ok(set) => set,
                Err(e) if e.is_skippable() => {
                    tracing::trace!(anchor_id = anchor_set.id, candidate, error = %e, "skipping candidate");
                    outcome.candidates_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            outcome.candidates_scanned += 1;

            let overlap = match &filter {
                Some(filter) => filter
                    .count_hits(candidate_set.members)
                    .min(anchor_set.len())
                    .min(candidate_set.len()),
                None => intersect(anchor_set.members, candidate_set.members),
            };
            let score = self.policy.score(overlap, anchor_set.len());
            if !self.policy.accepts(&score) {
                continue;
            }
            outcome.accepted += 1;

            let suggestion = Suggestion {
                anchor_id: anchor_set.id,
                candidate_id: candidate_set.id,
                score,
            };
            if selector.offer(suggestion, sink)? == Offer::Stop {
                outcome.stopped_early = true;
                break;
            }
        }

        outcome.written = selector.finish(sink)?;
        Ok(outcome)
    }
}
