// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Run configuration.
//!
//! Every knob of a run lives in [`RunConfig`]. Values come from three layers,
//! later ones winning: the defaults below, an optional JSON file, and command
//! line flags. The JSON file may set any subset of fields:
//!
//! ```json
//! {
//!   "mode": "fraction",
//!   "threshold": 0.25,
//!   "selection": { "early-exit": { "max_accepted": 100 } },
//!   "window": "all-except-self",
//!   "scan_order": { "randomized-start": { "seed": 7 } },
//!   "workers": 4
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::Partition;
use crate::error::EngineError;
use crate::filter::{DEFAULT_FILTER_BITS, DEFAULT_FILTER_THRESHOLD};
use crate::scoring::{
    CompareWindow, ScanOrder, ScoreMode, ScoringPolicy, Selection, DEFAULT_ABSOLUTE_THRESHOLD,
};

pub const DEFAULT_WORKERS: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub mode: ScoreMode,
    pub threshold: f64,
    pub selection: Selection,
    pub window: CompareWindow,
    pub scan_order: ScanOrder,
    /// Anchors with more members than this use the approximate filter.
    pub filter_threshold: usize,
    pub filter_bits: usize,
    pub workers: usize,
    pub partition: Partition,
    /// First anchor index to process; earlier anchors are assumed done.
    pub begin_at: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: ScoreMode::Absolute,
            threshold: DEFAULT_ABSOLUTE_THRESHOLD,
            selection: Selection::default(),
            window: CompareWindow::default(),
            scan_order: ScanOrder::default(),
            filter_threshold: DEFAULT_FILTER_THRESHOLD,
            filter_bits: DEFAULT_FILTER_BITS,
            workers: DEFAULT_WORKERS,
            partition: Partition::default(),
            begin_at: 0,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| {
            EngineError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy::new(self.mode, self.threshold)
    }

    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.workers == 0 {
            return invalid("workers must be at least 1".to_string());
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return invalid(format!("threshold must be a non-negative number, got {}", self.threshold));
        }
        if self.mode == ScoreMode::Fraction && self.threshold > 1.0 {
            return invalid(format!(
                "fraction threshold must be within [0, 1], got {}",
                self.threshold
            ));
        }
        match self.selection {
            Selection::TopN { n: 0 } => return invalid("top-n needs n >= 1".to_string()),
            Selection::EarlyExit { max_accepted: 0 } => {
                return invalid("early-exit needs max_accepted >= 1".to_string())
            }
            _ => {}
        }
        if let CompareWindow::Windowed { width: 0 } = self.window {
            return invalid("windowed compare needs width >= 1".to_string());
        }
        if self.filter_bits == 0 {
            return invalid("filter_bits must be at least 1".to_string());
        }
        Ok(())
    }
}
