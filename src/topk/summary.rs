use super::item::TopKItem;
use super::report::{Ranked, RankedEntry};
use crate::combine::ProfileValue;
use crate::config::ReportFormat;
use crate::error::ProfileError;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::num::NonZeroUsize;

/// The `capacity` most frequent values of one column.
///
/// Values are admitted through [`add`](Self::add) with their cumulative
/// count. Once the summary is full, a new value must beat the current
/// [`floor`](Self::floor) strictly to get in, and it evicts the worst
/// retained item. Among equal counts the value seen first is kept.
///
/// Storage is an ordered set in [`TopKItem`] order plus a hash index from
/// value to `(count, sequence)`, so lookups for the update-in-place path
/// are O(1) and eviction is O(log K). Memory is O(K) however many distinct
/// values are offered.
///
/// # Merging
/// [`merge`](Self::merge) sums the counts of values present in both
/// operands and keeps the top `capacity` of the union. Values a partition
/// already evicted are gone: a value that only qualifies once its counts
/// from several partitions are added up can be missing from the merged
/// result. That is the usual cost of merging local Top-K summaries instead
/// of full frequency tables.
#[derive(Clone, Debug)]
pub struct TopKSummary<V> {
    capacity: NonZeroUsize,
    next_sequence: u64,
    ranking: BTreeSet<TopKItem<V>>,
    index: HashMap<V, (i64, u64)>,
}

impl<V: ProfileValue> TopKSummary<V> {
    /// Create an empty summary holding at most `capacity` values.
    ///
    /// # Errors
    /// [`ProfileError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ProfileError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(ProfileError::InvalidCapacity(capacity))
    }

    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            next_sequence: 0,
            ranking: BTreeSet::new(),
            index: HashMap::with_capacity(capacity.get()),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ranking.len() >= self.capacity.get()
    }

    /// Lowest retained count, or `i64::MAX` while empty.
    #[must_use]
    pub fn floor(&self) -> i64 {
        self.ranking.first().map_or(i64::MAX, TopKItem::count)
    }

    /// Count currently recorded for `value`, if it is retained.
    #[must_use]
    pub fn count_of(&self, value: &V) -> Option<i64> {
        self.index.get(value).map(|&(count, _)| count)
    }

    #[must_use]
    pub fn contains(&self, value: &V) -> bool {
        self.index.contains_key(value)
    }

    /// Record that `value` has been seen `count` times so far.
    ///
    /// A retained value is updated in place and keeps its sequence. A new
    /// value is inserted while there is room; once full it is admitted only
    /// when `count > floor`, evicting the worst item.
    pub fn add(&mut self, value: V, count: i64) {
        if let Some(&(old_count, sequence)) = self.index.get(&value) {
            self.ranking
                .remove(&TopKItem::new(value.clone(), old_count, sequence));
            self.ranking
                .insert(TopKItem::new(value.clone(), count, sequence));
            self.index.insert(value, (count, sequence));
            return;
        }

        if self.is_full() {
            if count <= self.floor() {
                return;
            }
            if let Some(evicted) = self.ranking.pop_first() {
                self.index.remove(&evicted.value);
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.index.insert(value.clone(), (count, sequence));
        self.ranking.insert(TopKItem::new(value, count, sequence));
    }

    /// Combine two summaries into a fresh one; neither input is modified.
    ///
    /// Shared values get the sum of both counts (saturating) and the smaller
    /// of the two sequences. The result keeps the top `capacity` items of the
    /// union.
    ///
    /// # Errors
    /// [`ProfileError::CapacityMismatch`] when the capacities differ.
    pub fn merge(&self, other: &Self) -> Result<Self, ProfileError> {
        if self.capacity != other.capacity {
            return Err(ProfileError::CapacityMismatch {
                left: self.capacity(),
                right: other.capacity(),
            });
        }

        let mut union = self.index.clone();
        for (value, &(count, sequence)) in &other.index {
            union
                .entry(value.clone())
                .and_modify(|(c, s)| {
                    *c = c.saturating_add(count);
                    *s = (*s).min(sequence);
                })
                .or_insert((count, sequence));
        }

        let mut items: Vec<TopKItem<V>> = union
            .into_iter()
            .map(|(value, (count, sequence))| TopKItem::new(value, count, sequence))
            .collect();
        items.sort_unstable_by(|a, b| b.cmp(a));
        items.truncate(self.capacity());

        let mut merged = Self::with_capacity(self.capacity);
        merged.next_sequence = self.next_sequence.max(other.next_sequence);
        for item in items {
            merged.index.insert(item.value.clone(), (item.count, item.sequence));
            merged.ranking.insert(item);
        }
        Ok(merged)
    }

    /// Rank-ordered view: rank 1 is the highest count.
    ///
    /// The iterator borrows the summary and can be recreated (or cloned) to
    /// walk the entries again.
    #[must_use]
    pub fn ranked(&self) -> Ranked<'_, V> {
        Ranked::new(self.ranking.iter().rev())
    }

    /// Owned copy of [`ranked`](Self::ranked).
    #[must_use]
    pub fn to_ranked_vec(&self) -> Vec<RankedEntry<V>> {
        self.ranked().map(RankedEntry::cloned).collect()
    }

    /// Retained items in eviction order (worst first).
    pub fn items(&self) -> impl DoubleEndedIterator<Item = &TopKItem<V>> + ExactSizeIterator {
        self.ranking.iter()
    }
}

impl<V: ProfileValue + fmt::Display> TopKSummary<V> {
    /// Render every ranked entry as `rank<f>value<f>count<r>`.
    #[must_use]
    pub fn render(&self, format: &ReportFormat) -> String {
        super::report::render_ranked(self.ranked(), format)
    }
}

impl<V: ProfileValue + fmt::Display> fmt::Display for TopKSummary<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ReportFormat::default()))
    }
}

impl<V: ProfileValue> PartialEq for TopKSummary<V> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.ranking == other.ranking
    }
}

impl<V: ProfileValue> Eq for TopKSummary<V> {}

/* ---------- serde: validated round-trip through a plain state struct ---------- */

#[derive(Serialize, Deserialize)]
struct SummaryState<V> {
    capacity: usize,
    next_sequence: u64,
    items: Vec<TopKItem<V>>,
}

impl<V: ProfileValue> TryFrom<SummaryState<V>> for TopKSummary<V> {
    type Error = ProfileError;

    fn try_from(state: SummaryState<V>) -> Result<Self, Self::Error> {
        let mut summary = Self::new(state.capacity)?;
        if state.items.len() > state.capacity {
            return Err(ProfileError::CorruptSnapshot(format!(
                "{} items exceed capacity {}",
                state.items.len(),
                state.capacity
            )));
        }
        let mut next_sequence = state.next_sequence;
        for item in state.items {
            if summary.index.contains_key(&item.value) {
                return Err(ProfileError::CorruptSnapshot(format!(
                    "duplicate value {:?}",
                    item.value
                )));
            }
            next_sequence = next_sequence.max(item.sequence.saturating_add(1));
            summary
                .index
                .insert(item.value.clone(), (item.count, item.sequence));
            summary.ranking.insert(item);
        }
        summary.next_sequence = next_sequence;
        Ok(summary)
    }
}

impl<V: ProfileValue + Serialize> Serialize for TopKSummary<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SummaryState {
            capacity: self.capacity(),
            next_sequence: self.next_sequence,
            items: self.ranking.iter().cloned().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, V> Deserialize<'de> for TopKSummary<V>
where
    V: ProfileValue + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = SummaryState::<V>::deserialize(deserializer)?;
        Self::try_from(state).map_err(de::Error::custom)
    }
}
