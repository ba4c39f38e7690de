//! Top-K frequency combiners: `TopValues` and `MostFrequent`

use crate::combine::{CombineFn, LiftableCombiner, ProfileValue};
use crate::error::ProfileError;
use crate::topk::{RankedEntry, TopKSummary};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::num::NonZeroUsize;

/* ===================== TopValues<V> ===================== */

/// Top-K over `(value, cumulative count)` observations.
///
/// This is the merge operator of the reduce phase in combiner form: the
/// accumulator is a [`TopKSummary`] and `merge` is
/// [`TopKSummary::merge`]. Use it when counts are produced elsewhere.
///
/// - Accumulator: `TopKSummary<V>`
/// - Output: `Vec<RankedEntry<V>>`, rank 1 first.
#[derive(Clone, Debug)]
pub struct TopValues<V> {
    capacity: NonZeroUsize,
    _m: PhantomData<V>,
}

impl<V> TopValues<V> {
    /// # Errors
    /// [`ProfileError::InvalidCapacity`] when `k` is zero.
    pub fn new(k: usize) -> Result<Self, ProfileError> {
        NonZeroUsize::new(k)
            .map(Self::with_capacity)
            .ok_or(ProfileError::InvalidCapacity(k))
    }

    #[must_use]
    pub const fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            _m: PhantomData,
        }
    }

    #[must_use]
    pub const fn k(&self) -> usize {
        self.capacity.get()
    }
}

impl<V: ProfileValue> CombineFn<(V, i64), TopKSummary<V>, Vec<RankedEntry<V>>> for TopValues<V> {
    fn create(&self) -> TopKSummary<V> {
        TopKSummary::with_capacity(self.capacity)
    }

    fn add_input(&self, acc: &mut TopKSummary<V>, (value, count): (V, i64)) {
        acc.add(value, count);
    }

    fn merge(&self, acc: &mut TopKSummary<V>, other: TopKSummary<V>) -> Result<(), ProfileError> {
        *acc = acc.merge(&other)?;
        Ok(())
    }

    fn finish(&self, acc: TopKSummary<V>) -> Vec<RankedEntry<V>> {
        acc.to_ranked_vec()
    }
}

impl<V: ProfileValue> LiftableCombiner<(V, i64), TopKSummary<V>, Vec<RankedEntry<V>>>
    for TopValues<V>
{
    fn build_from_group(&self, values: &[(V, i64)]) -> TopKSummary<V> {
        let mut acc = self.create();
        for (v, c) in values.iter().cloned() {
            acc.add(v, c);
        }
        acc
    }
}

/* ===================== FrequencyTable<V> ===================== */

/// Exact per-partition frequencies, remembering first-seen order.
///
/// Feeding a summary in first-seen order gives earlier values the smaller
/// sequence, so they win count ties.
#[derive(Clone, Debug)]
pub struct FrequencyTable<V> {
    positions: HashMap<V, usize>,
    counts: Vec<(V, i64)>,
}

impl<V> Default for FrequencyTable<V> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            counts: Vec::new(),
        }
    }
}

impl<V: ProfileValue> FrequencyTable<V> {
    pub fn observe(&mut self, value: V) {
        if let Some(&i) = self.positions.get(&value) {
            self.counts[i].1 += 1;
        } else {
            self.positions.insert(value.clone(), self.counts.len());
            self.counts.push((value, 1));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn count_of(&self, value: &V) -> Option<i64> {
        self.positions.get(value).map(|&i| self.counts[i].1)
    }

    /// `(value, count)` pairs in first-seen order.
    pub fn into_observations(self) -> impl Iterator<Item = (V, i64)> {
        self.counts.into_iter()
    }
}

/* ===================== FrequentValues<V> ===================== */

/// Accumulator of [`MostFrequent`]: a pending frequency table for the
/// partition being scanned plus the bounded summary it is folded into.
///
/// [`seal`](Self::seal) moves pending counts into the summary and drops the
/// table; merge and serialization seal first, so partials that leave a
/// worker are always O(K).
#[derive(Clone, Debug)]
pub struct FrequentValues<V> {
    pending: Option<FrequencyTable<V>>,
    summary: TopKSummary<V>,
}

impl<V: ProfileValue> FrequentValues<V> {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            pending: None,
            summary: TopKSummary::with_capacity(capacity),
        }
    }

    pub fn observe(&mut self, value: V) {
        self.pending.get_or_insert_with(FrequencyTable::default).observe(value);
    }

    /// Fold pending frequencies into the summary.
    ///
    /// Counts are cumulative: a value already retained gets its new
    /// occurrences added to the retained count.
    pub fn seal(&mut self) {
        let Some(table) = self.pending.take() else {
            return;
        };
        for (value, count) in table.into_observations() {
            let total = self
                .summary
                .count_of(&value)
                .map_or(count, |prev| prev.saturating_add(count));
            self.summary.add(value, total);
        }
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.pending.is_none()
    }

    /// The bounded summary; call [`seal`](Self::seal) first to include
    /// pending counts.
    #[must_use]
    pub const fn summary(&self) -> &TopKSummary<V> {
        &self.summary
    }

    /// # Errors
    /// [`ProfileError::CapacityMismatch`] when the summaries differ in capacity.
    pub fn merge(&mut self, mut other: Self) -> Result<(), ProfileError> {
        self.seal();
        other.seal();
        self.summary = self.summary.merge(&other.summary)?;
        Ok(())
    }

    #[must_use]
    pub fn into_summary(mut self) -> TopKSummary<V> {
        self.seal();
        self.summary
    }
}

impl<V: ProfileValue + Serialize> Serialize for FrequentValues<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_sealed() {
            self.summary.serialize(serializer)
        } else {
            self.clone().into_summary().serialize(serializer)
        }
    }
}

impl<'de, V> Deserialize<'de> for FrequentValues<V>
where
    V: ProfileValue + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            pending: None,
            summary: TopKSummary::deserialize(deserializer)?,
        })
    }
}

/* ===================== MostFrequent<V> ===================== */

/// Top-K most frequent raw values.
///
/// Each partition counts its values exactly, then admits them into a
/// [`TopKSummary`] in first-seen order; the reduce phase merges summaries.
///
/// - Accumulator: [`FrequentValues<V>`]
/// - Output: `Vec<RankedEntry<V>>`, rank 1 first.
#[derive(Clone, Debug)]
pub struct MostFrequent<V> {
    capacity: NonZeroUsize,
    _m: PhantomData<V>,
}

impl<V> MostFrequent<V> {
    /// # Errors
    /// [`ProfileError::InvalidCapacity`] when `k` is zero.
    pub fn new(k: usize) -> Result<Self, ProfileError> {
        NonZeroUsize::new(k)
            .map(Self::with_capacity)
            .ok_or(ProfileError::InvalidCapacity(k))
    }

    #[must_use]
    pub const fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            _m: PhantomData,
        }
    }
}

impl<V: ProfileValue> CombineFn<V, FrequentValues<V>, Vec<RankedEntry<V>>> for MostFrequent<V> {
    fn create(&self) -> FrequentValues<V> {
        FrequentValues::new(self.capacity)
    }

    fn add_input(&self, acc: &mut FrequentValues<V>, v: V) {
        acc.observe(v);
    }

    fn merge(&self, acc: &mut FrequentValues<V>, other: FrequentValues<V>) -> Result<(), ProfileError> {
        acc.merge(other)
    }

    fn finish(&self, acc: FrequentValues<V>) -> Vec<RankedEntry<V>> {
        acc.into_summary().to_ranked_vec()
    }
}

impl<V: ProfileValue> LiftableCombiner<V, FrequentValues<V>, Vec<RankedEntry<V>>>
    for MostFrequent<V>
{
    fn build_from_group(&self, values: &[V]) -> FrequentValues<V> {
        let mut acc = self.create();
        for v in values.iter().cloned() {
            acc.observe(v);
        }
        acc.seal();
        acc
    }
}
