// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the exact merge and the approximate filter.
//!
//! The merge is checked against a `BTreeSet` oracle. The filter must never
//! report fewer hits than the true intersection: false positives are
//! allowed, false negatives are not.

#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use suggestomatic::{intersect, ApproxFilter};

fuzz_target!(|input: (Vec<u32>, Vec<u32>, u16)| {
    let (a, b, bits) = input;
    // Zero is padding in the corpus, never a member.
    let a: BTreeSet<u32> = a.into_iter().filter(|&m| m != 0).collect();
    let b: BTreeSet<u32> = b.into_iter().filter(|&m| m != 0).collect();
    let a: Vec<u32> = a.into_iter().collect();
    let b: Vec<u32> = b.into_iter().collect();

    let expected = a.iter().filter(|m| b.binary_search(m).is_ok()).count();
    assert_eq!(intersect(&a, &b), expected);
    assert_eq!(intersect(&b, &a), expected);

    let filter = ApproxFilter::from_members(&a, usize::from(bits).max(1));
    let hits = filter.count_hits(&b);
    assert!(hits >= expected, "filter lost members: {} < {}", hits, expected);
    assert!(hits <= b.len());
});
