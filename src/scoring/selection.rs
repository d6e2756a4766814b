// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Which accepted candidates get written, and when scanning stops.
//!
//! - **Top-N**: scan every candidate, keep every accepted one, then write the
//!   best `n` by descending score. Equal scores keep scan order (stable sort).
//! - **Early exit**: write each accepted candidate the moment it is seen and
//!   stop the anchor's scan after `max_accepted` of them. Cheaper, but a better
//!   candidate later in the scan is never looked at.
//!
//! The two produce different output and are never combined in one run.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scoring::Score;
use crate::sink::RecordSink;

pub const DEFAULT_TOP_N: usize = 50;
pub const DEFAULT_MAX_ACCEPTED: usize = 100;

/// One accepted pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Suggestion {
    pub anchor_id: u32,
    pub candidate_id: u32,
    pub score: Score,
}

/// Run-level selection policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    TopN { n: usize },
    EarlyExit { max_accepted: usize },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::TopN { n: DEFAULT_TOP_N }
    }
}

impl Selection {
    /// Fresh per-anchor state.
    pub fn selector(self) -> Selector {
        match self {
            Selection::TopN { n } => Selector::TopN {
                n,
                pending: Vec::new(),
            },
            Selection::EarlyExit { max_accepted } => Selector::EarlyExit {
                max_accepted,
                written: 0,
            },
        }
    }
}

/// Whether the scan of the current anchor should go on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    Continue,
    Stop,
}

/// Per-anchor selection state. Created at the start of an anchor, consumed
/// by [`Selector::finish`] at its end.
#[derive(Debug)]
pub enum Selector {
    TopN { n: usize, pending: Vec<Suggestion> },
    EarlyExit { max_accepted: usize, written: usize },
}

impl Selector {
    /// Hand over an accepted suggestion, in scan order.
    pub fn offer<S: RecordSink + ?Sized>(
        &mut self,
        suggestion: Suggestion,
        sink: &mut S,
    ) -> Result<Offer, EngineError> {
        match self {
            Selector::TopN { pending, .. } => {
                pending.push(suggestion);
                Ok(Offer::Continue)
            }
            Selector::EarlyExit {
                max_accepted,
                written,
            } => {
                sink.record(&suggestion)?;
                *written += 1;
                if *written >= *max_accepted {
                    Ok(Offer::Stop)
                } else {
                    Ok(Offer::Continue)
                }
            }
        }
    }

    /// Write whatever is still held back; returns how many records this
    /// anchor produced in total.
    pub fn finish<S: RecordSink + ?Sized>(self, sink: &mut S) -> Result<usize, EngineError> {
        match self {
            Selector::TopN { n, mut pending } => {
                pending.sort_by(|a, b| descending(&a.score, &b.score));
                pending.truncate(n);
                for suggestion in &pending {
                    sink.record(suggestion)?;
                }
                Ok(pending.len())
            }
            Selector::EarlyExit { written, .. } => Ok(written),
        }
    }
}

fn descending(a: &Score, b: &Score) -> Ordering {
    b.value().total_cmp(&a.value())
}
