//! Approximate distinct counting: `DistinctSketch` and `DistinctApprox`

use crate::combine::{CombineFn, LiftableCombiner};
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::marker::PhantomData;

/* ===================== DistinctSketch ===================== */

/// K-minimum-values sketch.
///
/// Keeps the `k` smallest 64-bit hashes seen. Until a hash has been dropped
/// (so up to and including `k` distinct hashes) the count is exact; past that
/// the estimate is `(k - 1) / r_k`, with `r_k` the largest kept hash scaled to
/// `[0, 1)`.
/// Merging is a union of the kept hashes, so it is commutative and
/// associative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctSketch {
    k: usize,
    hashes: BTreeSet<u64>,
    /// Set once any hash has been dropped.
    saturated: bool,
}

#[inline]
fn hash_of<T: Hash>(v: &T) -> u64 {
    // DefaultHasher::new() uses fixed keys, so hashes agree across workers.
    let mut h = DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

impl DistinctSketch {
    /// A sketch keeping `k` hashes; `k` is raised to 2 if smaller.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(2),
            hashes: BTreeSet::new(),
            saturated: false,
        }
    }

    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    pub fn observe<T: Hash>(&mut self, v: &T) {
        self.insert_hash(hash_of(v));
    }

    fn insert_hash(&mut self, h: u64) {
        if self.hashes.contains(&h) {
            return;
        }
        if self.hashes.len() >= self.k {
            self.saturated = true;
            match self.hashes.last() {
                Some(&largest) if h < largest => {
                    self.hashes.pop_last();
                }
                _ => return,
            }
        }
        self.hashes.insert(h);
    }

    /// Union with `other`. Sketches of different sizes merge at the smaller size.
    pub fn merge(&mut self, other: &Self) {
        self.k = self.k.min(other.k);
        self.saturated |= other.saturated;
        while self.hashes.len() > self.k {
            self.saturated = true;
            self.hashes.pop_last();
        }
        for &h in &other.hashes {
            self.insert_hash(h);
        }
    }

    /// `true` while the sketch still counts exactly.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        !self.saturated
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate(&self) -> f64 {
        if self.is_exact() {
            return self.hashes.len() as f64;
        }
        let Some(&largest) = self.hashes.last() else {
            return 0.0;
        };
        let r_k = (largest as f64 + 1.0) / (u64::MAX as f64 + 1.0);
        ((self.k as f64) - 1.0) / r_k
    }

    /// [`estimate`](Self::estimate) rounded to a whole count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimate_count(&self) -> u64 {
        self.estimate().round() as u64
    }
}

/* ===================== DistinctApprox<T> ===================== */

/// Approximate count of distinct values.
///
/// - Accumulator: [`DistinctSketch`]
/// - Output: `f64` (exact below `k` distinct values)
#[derive(Clone, Debug)]
pub struct DistinctApprox<T> {
    pub k: usize,
    _m: PhantomData<T>,
}

impl<T> DistinctApprox<T> {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(2),
            _m: PhantomData,
        }
    }
}

impl<T> CombineFn<T, DistinctSketch, f64> for DistinctApprox<T>
where
    T: Hash + Send + Sync + 'static,
{
    fn create(&self) -> DistinctSketch {
        DistinctSketch::new(self.k)
    }

    fn add_input(&self, acc: &mut DistinctSketch, v: T) {
        acc.observe(&v);
    }

    fn merge(&self, acc: &mut DistinctSketch, other: DistinctSketch) -> Result<(), ProfileError> {
        acc.merge(&other);
        Ok(())
    }

    fn finish(&self, acc: DistinctSketch) -> f64 {
        acc.estimate()
    }
}

impl<T> LiftableCombiner<T, DistinctSketch, f64> for DistinctApprox<T>
where
    T: Hash + Send + Sync + 'static,
{
    fn build_from_group(&self, values: &[T]) -> DistinctSketch {
        let mut acc = self.create();
        for v in values {
            acc.observe(v);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_below_k() {
        let mut s = DistinctSketch::new(16);
        for v in [1, 2, 3, 2, 1] {
            s.observe(&v);
        }
        assert!(s.is_exact());
        assert_eq!(s.estimate_count(), 3);
    }

    #[test]
    fn exact_up_to_and_including_k() {
        let mut s = DistinctSketch::new(4);
        (0..4).for_each(|v| s.observe(&v));
        s.observe(&2);
        assert!(s.is_exact());
        assert_eq!(s.estimate_count(), 4);

        s.observe(&4);
        assert!(!s.is_exact());
    }

    #[test]
    fn merge_past_k_is_not_exact() {
        let mut a = DistinctSketch::new(4);
        let mut b = DistinctSketch::new(4);
        (0..2).for_each(|v| a.observe(&v));
        (2..4).for_each(|v| b.observe(&v));
        a.merge(&b);
        assert!(a.is_exact());
        assert_eq!(a.estimate_count(), 4);

        let mut c = DistinctSketch::new(4);
        c.observe(&99);
        a.merge(&c);
        assert!(!a.is_exact());
    }

    #[test]
    fn merge_is_order_independent() {
        let mut a = DistinctSketch::new(8);
        let mut b = DistinctSketch::new(8);
        (0..50).for_each(|v| a.observe(&v));
        (25..90).for_each(|v| b.observe(&v));
        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn estimate_is_in_the_right_range() {
        let mut s = DistinctSketch::new(256);
        (0..10_000u32).for_each(|v| s.observe(&v));
        let est = s.estimate();
        assert!(est > 7_000.0 && est < 13_000.0, "estimate {est}");
    }
}
