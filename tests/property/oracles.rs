//! Reference oracles for differential testing.
//!
//! Simple, obviously-correct versions of the engine's pieces. They are slow
//! and allocate freely; that is the point.

use std::collections::BTreeSet;

use suggestomatic::{CompareWindow, RunConfig, ScoreMode, Selection};

/// Intersection size through `BTreeSet`.
pub fn oracle_intersection(a: &[u32], b: &[u32]) -> usize {
    let a: BTreeSet<u32> = a.iter().copied().collect();
    let b: BTreeSet<u32> = b.iter().copied().collect();
    a.intersection(&b).count()
}

/// Candidate list indices for `anchor`, sequential scan order.
pub fn oracle_window(window: CompareWindow, anchor: usize, count: usize) -> Vec<usize> {
    match window {
        CompareWindow::Following => (anchor + 1..count).collect(),
        CompareWindow::AllExceptSelf => (0..count).filter(|&i| i != anchor).collect(),
        CompareWindow::Windowed { width } => (anchor + 1..count).take(width).collect(),
    }
}

/// Every row a run with `config` (sequential scan, exact path) should write,
/// sorted by (anchor, candidate).
pub fn oracle_rows(corpus: &[(u32, Vec<u32>)], config: &RunConfig) -> Vec<(u32, u32, f64)> {
    let mut rows = Vec::new();

    for anchor in config.begin_at..corpus.len() {
        let (anchor_id, anchor_members) = &corpus[anchor];
        if anchor_members.is_empty() {
            continue;
        }

        let mut accepted = Vec::new();
        for candidate in oracle_window(config.window, anchor, corpus.len()) {
            let (candidate_id, candidate_members) = &corpus[candidate];
            let shared = oracle_intersection(anchor_members, candidate_members);
            let (score, keep) = match config.mode {
                ScoreMode::Absolute => (shared as f64, shared as f64 > config.threshold),
                ScoreMode::Fraction => {
                    let f = shared as f64 / anchor_members.len() as f64;
                    (f, shared > 0 && f >= config.threshold)
                }
            };
            if keep {
                accepted.push((*anchor_id, *candidate_id, score));
            }
        }

        match config.selection {
            Selection::TopN { n } => {
                // Stable: ties keep scan order.
                accepted.sort_by(|a, b| b.2.total_cmp(&a.2));
                accepted.truncate(n);
            }
            Selection::EarlyExit { max_accepted } => accepted.truncate(max_accepted),
        }
        rows.extend(accepted);
    }

    rows.sort_by_key(|r| (r.0, r.1));
    rows
}
