// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for resolving sets out of arbitrary corpus words.
//!
//! Corpus files come from an external generator and are trusted only as far
//! as their length is a whole number of words. Offsets can point anywhere,
//! ids can repeat, the index can be shorter than the largest id. Every one
//! of those must surface as a `CorpusError`, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use suggestomatic::SetStore;

#[derive(Debug, Arbitrary)]
struct Corpus {
    set_ids: Vec<u32>,
    set_index: Vec<u32>,
    set_members: Vec<u32>,
}

fuzz_target!(|corpus: Corpus| {
    let Corpus {
        mut set_ids,
        set_index,
        set_members,
    } = corpus;

    // Keep ids small enough that some of them land inside the index.
    if let Some(len) = set_index.len().checked_add(4) {
        for id in &mut set_ids {
            *id %= len as u32;
        }
    }

    let store = SetStore::from_words(set_ids, set_index, set_members);

    for index in 0..=store.set_count() {
        if let Ok(view) = store.resolve(index) {
            // A resolved view never ends in a padding zero.
            assert_ne!(view.members.last(), Some(&0));
            assert_eq!(store.set_id(index), Some(view.id));
        }
    }

    for &id in store.set_ids() {
        let _ = store.resolve_by_id(id);
    }

    let _ = store.stats(8);
    let _ = store.unsorted_sets(16);
});
