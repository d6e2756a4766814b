// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate membership filter for oversized anchors.
//!
//! When an anchor has more members than the filter threshold, merging it
//! against every candidate costs O(|anchor|) per candidate. Instead we build
//! a bloom filter over the anchor once and probe it with each candidate's
//! members, which costs O(|candidate|) per candidate regardless of how big
//! the anchor is.
//!
//! # Guarantees
//!
//! - No false negatives: every inserted value answers `true`.
//! - False positives happen at roughly `(1 - e^{-kn/m})^k` for `m` bits,
//!   `n` inserted values and `k` probes. At the defaults (2.5M bits, anchors
//!   just past 40K members) that is below 1e-6.
//!
//! The hit count therefore over-estimates the true intersection. Callers
//! clamp it to `min(|anchor|, |candidate|)`, which is a hard upper bound.
//!
//! # Lifetime
//!
//! One filter per oversized anchor, owned by the call that processes that
//! anchor and dropped with it. Nothing keeps a filter between anchors.

use fixedbitset::FixedBitSet;

/// Anchors longer than this use the filter path.
pub const DEFAULT_FILTER_THRESHOLD: usize = 40_000;

/// Bits allocated per filter.
pub const DEFAULT_FILTER_BITS: usize = 2_500_000;

/// Upper bound on hash probes per value.
const MAX_PROBES: u32 = 16;

/// Bloom filter over u32 member ids.
#[derive(Clone, Debug)]
pub struct ApproxFilter {
    bits: FixedBitSet,
    probes: u32,
    inserted: usize,
}

impl ApproxFilter {
    /// Empty filter with `bits` bits, tuned for about `expected_items` values.
    pub fn with_capacity(bits: usize, expected_items: usize) -> Self {
        let bits = bits.max(64);
        Self {
            bits: FixedBitSet::with_capacity(bits),
            probes: optimal_probes(bits, expected_items),
            inserted: 0,
        }
    }

    /// Filter holding every non-zero member of `members`.
    pub fn from_members(members: &[u32], bits: usize) -> Self {
        let mut filter = Self::with_capacity(bits, members.len());
        for &member in members {
            filter.insert(member);
        }
        filter
    }

    /// Add `value`. Zero is not a member and is ignored.
    pub fn insert(&mut self, value: u32) {
        if value == 0 {
            return;
        }
        let (h1, h2, m) = self.seeds(value);
        for i in 0..u64::from(self.probes) {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % m;
            self.bits.insert(bit as usize);
        }
        self.inserted += 1;
    }

    /// `false` means definitely absent; `true` means probably present.
    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        if value == 0 {
            return false;
        }
        let (h1, h2, m) = self.seeds(value);
        (0..u64::from(self.probes)).all(|i| {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % m;
            self.bits.contains(bit as usize)
        })
    }

    /// How many of `candidate`'s members the filter reports as present.
    pub fn count_hits(&self, candidate: &[u32]) -> usize {
        candidate.iter().filter(|&&member| self.contains(member)).count()
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn probes(&self) -> u32 {
        self.probes
    }

    /// Values inserted so far (zeros excluded).
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Expected false-positive rate for the current fill.
    pub fn estimated_fp_rate(&self) -> f64 {
        let m = self.bits.len() as f64;
        let n = self.inserted as f64;
        let k = f64::from(self.probes);
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Two independent 64-bit hashes for double hashing.
    #[inline]
    fn seeds(&self, value: u32) -> (u64, u64, u64) {
        let mixed = mix64(u64::from(value));
        let h1 = mixed;
        // Odd step so consecutive probes never collapse onto one bit.
        let h2 = mix64(mixed ^ 0x9E37_79B9_7F4A_7C15) | 1;
        (h1, h2, self.bits.len() as u64)
    }
}

/// k = (m / n) ln 2, clamped to [1, MAX_PROBES].
fn optimal_probes(bits: usize, items: usize) -> u32 {
    if items == 0 {
        return 1;
    }
    let k = (bits as f64 / items as f64) * std::f64::consts::LN_2;
    (k.round() as u32).clamp(1, MAX_PROBES)
}

/// splitmix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
