//! Merge intersection against the set oracle.

use proptest::prelude::*;
use suggestomatic::intersect;

use crate::common::members_strategy;
use crate::oracles::oracle_intersection;

proptest! {
    /// Property: the merge count equals the set-theoretic count.
    #[test]
    fn prop_intersect_matches_oracle(
        a in members_strategy(500, 200),
        b in members_strategy(500, 200),
    ) {
        prop_assert_eq!(intersect(&a, &b), oracle_intersection(&a, &b));
    }

    /// Property: argument order doesn't matter.
    #[test]
    fn prop_intersect_symmetric(
        a in members_strategy(100, 60),
        b in members_strategy(100, 60),
    ) {
        prop_assert_eq!(intersect(&a, &b), intersect(&b, &a));
    }

    /// Property: bounded by the smaller input.
    #[test]
    fn prop_intersect_bounded(
        a in members_strategy(100, 60),
        b in members_strategy(100, 60),
    ) {
        prop_assert!(intersect(&a, &b) <= a.len().min(b.len()));
    }

    /// Property: a set fully overlaps itself, and nothing overlaps the empty set.
    #[test]
    fn prop_intersect_self_and_empty(a in members_strategy(1000, 100)) {
        prop_assert_eq!(intersect(&a, &a), a.len());
        prop_assert_eq!(intersect(&a, &[]), 0);
        prop_assert_eq!(intersect(&[], &a), 0);
    }

    /// Property: disjoint value ranges never intersect.
    #[test]
    fn prop_intersect_disjoint_ranges(
        a in members_strategy(100, 50),
        b in members_strategy(100, 50),
    ) {
        let shifted: Vec<u32> = b.iter().map(|x| x + 1000).collect();
        prop_assert_eq!(intersect(&a, &shifted), 0);
    }
}
