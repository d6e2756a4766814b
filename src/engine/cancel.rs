// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation, checked between anchors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared stop flag. Workers finish the anchor in hand, flush, then stop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancel from a background thread once `limit` has passed.
    pub fn cancel_after(&self, limit: Duration) {
        let token = self.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            tracing::info!(seconds = limit.as_secs(), "time limit reached, stopping after current anchors");
            token.cancel();
        });
    }
}
