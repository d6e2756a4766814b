//! Approximate filter: one-sided error only.

use proptest::prelude::*;
use suggestomatic::{intersect, ApproxFilter};

use crate::common::members_strategy;

proptest! {
    /// Property: every inserted member is reported present.
    #[test]
    fn prop_filter_no_false_negatives(
        members in members_strategy(100_000, 2000),
        bits in 64usize..100_000,
    ) {
        let filter = ApproxFilter::from_members(&members, bits);
        for &m in &members {
            prop_assert!(filter.contains(m), "member {} missing", m);
        }
    }

    /// Property: hit counts never undercount the exact intersection.
    #[test]
    fn prop_filter_hits_at_least_exact(
        anchor in members_strategy(5000, 1500),
        candidate in members_strategy(5000, 300),
    ) {
        let filter = ApproxFilter::from_members(&anchor, 1 << 16);
        prop_assert!(filter.count_hits(&candidate) >= intersect(&anchor, &candidate));
        prop_assert!(filter.count_hits(&candidate) <= candidate.len());
    }

    /// Property: zero is never a member.
    #[test]
    fn prop_filter_rejects_zero(members in members_strategy(1000, 500)) {
        let filter = ApproxFilter::from_members(&members, 4096);
        prop_assert!(!filter.contains(0));
    }
}
