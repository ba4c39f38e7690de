use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One retained value of a [`TopKSummary`](super::TopKSummary).
///
/// Items order by `count` ascending, then `sequence` descending, then
/// `value` descending. The smallest item is therefore the eviction
/// candidate: lowest count, and among equal counts the one first seen
/// last. Iterating in reverse gives rank order.
///
/// The `value` key only matters once a merge has left two distinct values
/// with the same count and sequence; it keeps the order total so merged
/// output does not depend on operand order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopKItem<V> {
    pub(crate) value: V,
    pub(crate) count: i64,
    pub(crate) sequence: u64,
}

impl<V> TopKItem<V> {
    pub const fn new(value: V, count: i64, sequence: u64) -> Self {
        Self {
            value,
            count,
            sequence,
        }
    }

    pub const fn value(&self) -> &V {
        &self.value
    }

    pub const fn count(&self) -> i64 {
        self.count
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V: Ord> PartialOrd for TopKItem<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: Ord> Ord for TopKItem<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.sequence.cmp(&self.sequence))
            .then_with(|| other.value.cmp(&self.value))
    }
}
