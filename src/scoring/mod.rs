// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and selection: how raw intersection counts become suggestions.
//!
//! Three independent knobs, each fixed for a run: the score mode and its
//! threshold, the selection policy (top-N or early exit), and the compare
//! window with its scan order.

mod core;
pub mod selection;
pub mod window;

pub use self::core::*;
pub use selection::{
    Offer, Selection, Selector, Suggestion, DEFAULT_MAX_ACCEPTED, DEFAULT_TOP_N,
};
pub use window::{candidates, Candidates, CompareWindow, ScanOrder};
