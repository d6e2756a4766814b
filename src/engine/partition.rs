// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Splitting the anchor range between workers.
//!
//! Every index in `[begin_at, count)` goes to exactly one worker.
//!
//! ```text
//! 10 anchors, 3 workers, begin_at = 0
//!
//! Interleaved   w0: 0 3 6 9   w1: 1 4 7   w2: 2 5 8
//! Contiguous    w0: 0 1 2 3   w1: 4 5 6   w2: 7 8 9
//! ```
//!
//! Interleaved is the default. Anchors early in the list compare against more
//! candidates under the `following` window, so contiguous chunks leave the
//! first worker with most of the work.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partition {
    #[default]
    Interleaved,
    Contiguous,
}

/// The anchors one worker owns: `begin, begin + stride, ...` below `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Share {
    pub worker: usize,
    begin: usize,
    end: usize,
    stride: usize,
}

impl Share {
    /// Anchor indices in processing order.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.begin..self.end).step_by(self.stride)
    }

    pub fn len(&self) -> usize {
        if self.begin >= self.end {
            0
        } else {
            (self.end - self.begin).div_ceil(self.stride)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One share per worker over `[begin_at, count)`.
pub fn assign(partition: Partition, begin_at: usize, count: usize, workers: usize) -> Vec<Share> {
    let workers = workers.max(1);
    let begin_at = begin_at.min(count);

    match partition {
        Partition::Interleaved => (0..workers)
            .map(|worker| Share {
                worker,
                begin: begin_at + worker,
                end: count,
                stride: workers,
            })
            .collect(),
        Partition::Contiguous => {
            let total = count - begin_at;
            let base = total / workers;
            let extra = total % workers;
            let mut begin = begin_at;
            (0..workers)
                .map(|worker| {
                    let len = base + usize::from(worker < extra);
                    let share = Share {
                        worker,
                        begin,
                        end: begin + len,
                        stride: 1,
                    };
                    begin += len;
                    share
                })
                .collect()
        }
    }
}
