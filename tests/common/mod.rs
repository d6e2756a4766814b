//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use suggestomatic::{CorpusPaths, RunConfig, RunReport, Scheduler, SetStore};
use tempfile::TempDir;

pub use suggestomatic::testing::{membership_csv, parse_output, store_from_sets, write_corpus};

// ============================================================================
// FIXTURES
// ============================================================================

/// The three-set corpus used throughout the docs.
pub const THREE_SETS: &[(u32, &[u32])] = &[(1, &[10, 20, 30]), (2, &[20, 30, 40]), (3, &[50])];

/// A corpus on disk in its own temp dir. Keep the `TempDir` alive.
pub fn corpus_on_disk(sets: &[(u32, &[u32])]) -> (TempDir, CorpusPaths) {
    let dir = tempfile::tempdir().expect("temp dir");
    let paths = write_corpus(dir.path(), sets);
    (dir, paths)
}

/// Run `config` over `store`, writing under `dir`, and return every output
/// row from every worker, sorted by (anchor, candidate).
pub fn run_rows(store: &SetStore, config: &RunConfig, dir: &Path) -> (RunReport, Vec<(u32, u32, f64)>) {
    let report = Scheduler::new(store, config)
        .run(&dir.join("suggestions.csv"))
        .expect("run");
    let mut rows = Vec::new();
    for output in report.outputs() {
        let text = fs::read_to_string(output).unwrap_or_default();
        rows.extend(parse_output(&text));
    }
    rows.sort_by_key(|r| (r.0, r.1));
    (report, rows)
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// A sorted, duplicate-free member list (no zeros).
pub fn members_strategy(max_member: u32, max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(1..=max_member, 0..=max_len)
        .prop_map(|set: BTreeSet<u32>| set.into_iter().collect())
}

/// A small corpus: distinct set ids with random member lists, in a random
/// list order.
pub fn corpus_strategy() -> impl Strategy<Value = Vec<(u32, Vec<u32>)>> {
    prop::collection::btree_set(1u32..200, 1..12)
        .prop_flat_map(|ids| {
            let ids: Vec<u32> = ids.into_iter().collect();
            let n = ids.len();
            (
                Just(ids).prop_shuffle(),
                prop::collection::vec(members_strategy(60, 25), n),
            )
        })
        .prop_map(|(ids, members)| ids.into_iter().zip(members).collect())
}

/// Borrowed view of an owned corpus, in the shape the helpers take.
pub fn as_sets(corpus: &[(u32, Vec<u32>)]) -> Vec<(u32, &[u32])> {
    corpus.iter().map(|(id, m)| (*id, m.as_slice())).collect()
}
