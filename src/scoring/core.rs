// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning an intersection count into a score, and deciding acceptance.
//!
//! Two modes, fixed for a run:
//!
//! | Mode       | Score                        | Accepted when        |
//! |------------|------------------------------|----------------------|
//! | `Absolute` | intersection count           | `score > threshold`  |
//! | `Fraction` | count ÷ anchor length, [0,1] | `score >= threshold` |
//!
//! Read the thresholds as "more than N shared members" and "at least X of the
//! anchor". In both modes a candidate sharing no members is never accepted,
//! so a fraction threshold of 0 still means "any overlap at all".
//!
//! Fraction mode is directional. `fraction(a, b)` divides by `|a|`, so it is
//! generally not equal to `fraction(b, a)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default absolute threshold: any overlap at all.
pub const DEFAULT_ABSOLUTE_THRESHOLD: f64 = 0.0;

/// How intersection counts become scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreMode {
    #[default]
    Absolute,
    Fraction,
}

impl ScoreMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreMode::Absolute => "absolute",
            ScoreMode::Fraction => "fraction",
        }
    }
}

/// A candidate's score against its anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    Count(u64),
    Fraction(f64),
}

impl Score {
    /// Numeric value for ordering within one run.
    pub fn value(&self) -> f64 {
        match *self {
            Score::Count(count) => count as f64,
            Score::Fraction(fraction) => fraction,
        }
    }
}

/// Output format: integers for counts, six decimals for fractions.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Score::Count(count) => write!(f, "{}", count),
            Score::Fraction(fraction) => write!(f, "{:.6}", fraction),
        }
    }
}

/// Mode plus threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringPolicy {
    pub mode: ScoreMode,
    pub threshold: f64,
}

impl ScoringPolicy {
    pub fn new(mode: ScoreMode, threshold: f64) -> Self {
        Self { mode, threshold }
    }

    /// Score `intersection` shared members against an anchor of `anchor_len`.
    #[inline]
    pub fn score(&self, intersection: usize, anchor_len: usize) -> Score {
        match self.mode {
            ScoreMode::Absolute => Score::Count(intersection as u64),
            ScoreMode::Fraction => {
                if anchor_len == 0 {
                    Score::Fraction(0.0)
                } else {
                    Score::Fraction((intersection as f64 / anchor_len as f64).min(1.0))
                }
            }
        }
    }

    #[inline]
    pub fn accepts(&self, score: &Score) -> bool {
        match *score {
            Score::Count(count) => count as f64 > self.threshold,
            Score::Fraction(fraction) => fraction > 0.0 && fraction >= self.threshold,
        }
    }
}
