// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Which candidates an anchor is compared to, and in what order.
//!
//! The window picks the candidate indices:
//!
//! ```text
//! anchor a, n sets
//! Following          a+1 .. n            each unordered pair once
//! AllExceptSelf      0 .. n without a    needed for directional scores
//! Windowed { w }     a+1 .. min(a+1+w, n)
//! ```
//!
//! The scan order decides where in that window the scan starts. Sequential
//! starts at the first index. Randomized-start rotates the window by an offset
//! drawn from an RNG seeded with `seed ^ anchor`, so a run is reproducible and
//! an early-exit budget is not always spent on the lowest indices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareWindow {
    #[default]
    Following,
    AllExceptSelf,
    Windowed {
        width: usize,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrder {
    #[default]
    Sequential,
    RandomizedStart {
        seed: u64,
    },
}

/// Candidate indices for `anchor` out of `count` sets, in scan order.
pub fn candidates(
    window: CompareWindow,
    order: ScanOrder,
    anchor: usize,
    count: usize,
) -> Candidates {
    let (lo, hi, skip) = match window {
        CompareWindow::Following => (anchor + 1, count, None),
        CompareWindow::AllExceptSelf => (0, count, (anchor < count).then_some(anchor)),
        CompareWindow::Windowed { width } => {
            let lo = anchor + 1;
            (lo, lo.saturating_add(width).min(count), None)
        }
    };
    let lo = lo.min(hi);
    let len = (hi - lo) - usize::from(skip.is_some());

    let start = match order {
        ScanOrder::Sequential => 0,
        ScanOrder::RandomizedStart { seed } if len > 0 => {
            let mut rng = StdRng::seed_from_u64(seed ^ anchor as u64);
            rng.gen_range(0..len)
        }
        ScanOrder::RandomizedStart { .. } => 0,
    };

    Candidates {
        lo,
        len,
        skip,
        start,
        step: 0,
    }
}

/// Iterator over candidate indices; see [`candidates`].
#[derive(Clone, Debug)]
pub struct Candidates {
    lo: usize,
    len: usize,
    skip: Option<usize>,
    start: usize,
    step: usize,
}

impl Candidates {
    /// Map a position in the (self-free) window to a list index.
    fn index_at(&self, position: usize) -> usize {
        let index = self.lo + position;
        match self.skip {
            Some(skip) if index >= skip => index + 1,
            _ => index,
        }
    }
}

impl Iterator for Candidates {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.step >= self.len {
            return None;
        }
        let position = (self.start + self.step) % self.len;
        self.step += 1;
        Some(self.index_at(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates {}
