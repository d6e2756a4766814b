// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Exact intersection size of two sorted member arrays.
//!
//! A two-cursor merge: compare heads, count and advance both on a match,
//! otherwise advance whichever is smaller. One pass, O(|a| + |b|), no
//! allocation. This is the inner loop of every exact comparison.
//!
//! Both inputs must be ascending and duplicate-free. The set store hands out
//! slices that already satisfy this; nothing here re-checks it.

/// Number of values present in both `a` and `b`.
///
/// ```
/// use suggestomatic::intersect;
///
/// let a = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// let b = [5, 6, 7, 8, 9, 10, 11, 12];
/// assert_eq!(intersect(&a, &b), 6);
/// ```
#[inline]
pub fn intersect(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut count = 0;

    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);
        if x == y {
            count += 1;
            i += 1;
            j += 1;
        } else if x < y {
            i += 1;
        } else {
            j += 1;
        }
    }

    count
}
