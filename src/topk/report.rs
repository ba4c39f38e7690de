use super::item::TopKItem;
use crate::config::ReportFormat;
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::fmt::{self, Write};
use std::iter::{FusedIterator, Rev};

/// One line of ranked output.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankedEntry<V> {
    /// 1-based rank; 1 is the most frequent value.
    pub rank: usize,
    pub value: V,
    pub count: i64,
}

impl<V> RankedEntry<V> {
    pub const fn new(rank: usize, value: V, count: i64) -> Self {
        Self { rank, value, count }
    }
}

impl<V: Clone> RankedEntry<&V> {
    #[must_use]
    pub fn cloned(self) -> RankedEntry<V> {
        RankedEntry {
            rank: self.rank,
            value: self.value.clone(),
            count: self.count,
        }
    }
}

/// Lazy rank-ordered walk over a summary. See
/// [`TopKSummary::ranked`](super::TopKSummary::ranked).
#[derive(Clone, Debug)]
pub struct Ranked<'a, V> {
    inner: Rev<btree_set::Iter<'a, TopKItem<V>>>,
    next_rank: usize,
}

impl<'a, V> Ranked<'a, V> {
    pub(crate) const fn new(inner: Rev<btree_set::Iter<'a, TopKItem<V>>>) -> Self {
        Self {
            inner,
            next_rank: 1,
        }
    }
}

impl<'a, V> Iterator for Ranked<'a, V> {
    type Item = RankedEntry<&'a V>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        let rank = self.next_rank;
        self.next_rank += 1;
        Some(RankedEntry::new(rank, &item.value, item.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Ranked<'_, V> {}
impl<V> FusedIterator for Ranked<'_, V> {}

/// Render ranked entries with the run's delimiters.
///
/// Every entry, including the last, is followed by the record delimiter.
///
/// Values are written as-is, without escaping. [`parse_rendered`] tolerates
/// the field delimiter inside a value, but a value containing the record
/// delimiter splits its record and the text no longer parses back.
pub fn render_ranked<I, V>(entries: I, format: &ReportFormat) -> String
where
    I: IntoIterator<Item = RankedEntry<V>>,
    V: fmt::Display,
{
    let mut out = String::new();
    for e in entries {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{rank}{f}{value}{f}{count}{r}",
            rank = e.rank,
            value = e.value,
            count = e.count,
            f = format.field_delimiter,
            r = format.record_delimiter,
        );
    }
    out
}

/// Parse text produced by [`render_ranked`] back into `(rank, value, count)`
/// triples, values kept as text.
///
/// The rank is taken up to the first field delimiter and the count after the
/// last one, so values may themselves contain the field delimiter.
///
/// Returns `None` if any record is malformed.
#[must_use]
pub fn parse_rendered(text: &str, format: &ReportFormat) -> Option<Vec<RankedEntry<String>>> {
    let f = format.field_delimiter.as_str();
    text.split(format.record_delimiter.as_str())
        .filter(|rec| !rec.is_empty())
        .map(|rec| {
            let (rank, rest) = rec.split_once(f)?;
            let (value, count) = rest.rsplit_once(f)?;
            Some(RankedEntry::new(
                rank.parse().ok()?,
                value.to_owned(),
                count.parse().ok()?,
            ))
        })
        .collect()
}
