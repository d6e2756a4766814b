// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use std::path::Path;

use crate::corpus::prepare::CorpusWords;
use crate::corpus::{CorpusPaths, SetStore};

/// Build an in-memory store from `(set_id, members)` pairs, in list order.
///
/// Members must already be ascending. Panics on ids that don't fit the
/// layout, which only happens with a broken fixture.
pub fn store_from_sets(sets: &[(u32, &[u32])]) -> SetStore {
    words_from_sets(sets).into_store()
}

/// Write `sets` as a corpus under `dir` and return its paths.
pub fn write_corpus(dir: &Path, sets: &[(u32, &[u32])]) -> CorpusPaths {
    let paths = CorpusPaths::in_dir(dir);
    words_from_sets(sets)
        .write(&paths)
        .expect("write test corpus");
    paths
}

/// Membership CSV text (`member_id,set_id` per line) for `sets`.
pub fn membership_csv(sets: &[(u32, &[u32])]) -> String {
    let mut out = String::new();
    for (set_id, members) in sets {
        for member in *members {
            out.push_str(&format!("{},{}\n", member, set_id));
        }
    }
    out
}

/// Parse suggestion output lines into `(anchor, candidate, score)` triples.
pub fn parse_output(text: &str) -> Vec<(u32, u32, f64)> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split(',');
            let mut next = || fields.next().expect("three fields");
            let anchor = next().parse().expect("anchor id");
            let candidate = next().parse().expect("candidate id");
            let score = next().parse().expect("score");
            (anchor, candidate, score)
        })
        .collect()
}

fn words_from_sets(sets: &[(u32, &[u32])]) -> CorpusWords {
    CorpusWords::from_sets(sets.iter().map(|(id, members)| (*id, members.iter().copied())))
        .expect("valid test corpus")
}
