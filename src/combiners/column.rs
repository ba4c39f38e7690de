//! Whole-column statistics: `ColumnStats` (one column) and `RowStats` (every
//! column of a row).
//!
//! [`ColumnAccumulator`] is the per-partition column aggregator: one pass over
//! a partition's values keeps counts, min/max, moments, string lengths, a
//! distinct-count sketch and the pending frequency table behind the Top-K
//! summary. Sealing folds the frequency table into the summary so the
//! accumulator that leaves a worker is bounded by the Top-K capacity and the
//! sketch size.

use super::distinct::DistinctSketch;
use super::statistical::MomentsAcc;
use super::topk::FrequentValues;
use crate::combine::{CombineFn, LiftableCombiner};
use crate::error::ProfileError;
use crate::report::{BooleanStats, ColumnProfile, StringStats};
use crate::schema::{ColumnSpec, Schema};
use crate::value::{ColumnKind, ColumnValue, Row};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::num::NonZeroUsize;

/// Mergeable per-column state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnAccumulator {
    kind: ColumnKind,
    total: u64,
    nulls: u64,
    empties: u64,
    min: Option<ColumnValue>,
    max: Option<ColumnValue>,
    moments: MomentsAcc,
    true_count: u64,
    false_count: u64,
    shortest: Option<String>,
    longest: Option<String>,
    distinct: DistinctSketch,
    frequent: FrequentValues<ColumnValue>,
}

/// Shorter wins; equal lengths fall back to lexicographic order so merges
/// pick the same string whatever the operand order.
fn shorter(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

impl ColumnAccumulator {
    #[must_use]
    pub fn new(kind: ColumnKind, capacity: NonZeroUsize, sketch_size: usize) -> Self {
        Self {
            kind,
            total: 0,
            nulls: 0,
            empties: 0,
            min: None,
            max: None,
            moments: MomentsAcc::default(),
            true_count: 0,
            false_count: 0,
            shortest: None,
            longest: None,
            distinct: DistinctSketch::new(sketch_size),
            frequent: FrequentValues::new(capacity),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Top-K capacity of the frequency summary.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.frequent.summary().capacity()
    }

    /// # Errors
    /// [`ProfileError::InvalidConfig`] when the column kinds differ,
    /// [`ProfileError::CapacityMismatch`] when the Top-K capacities differ.
    pub fn check_mergeable(&self, other: &Self) -> Result<(), ProfileError> {
        if self.kind != other.kind {
            return Err(ProfileError::InvalidConfig(format!(
                "cannot merge a {} column with a {} column",
                self.kind, other.kind
            )));
        }
        if self.capacity() != other.capacity() {
            return Err(ProfileError::CapacityMismatch {
                left: self.capacity(),
                right: other.capacity(),
            });
        }
        Ok(())
    }

    /// Account for one cell.
    pub fn observe(&mut self, value: ColumnValue) {
        self.total += 1;
        if value.is_null() {
            self.nulls += 1;
            self.frequent.observe(value);
            return;
        }

        self.distinct.observe(&value);
        if self.min.as_ref().is_none_or(|m| value < *m) {
            self.min = Some(value.clone());
        }
        if self.max.as_ref().is_none_or(|m| value > *m) {
            self.max = Some(value.clone());
        }

        match &value {
            ColumnValue::Int(_) | ColumnValue::Float(_) => {
                if let Some(x) = value.as_f64() {
                    self.moments.push(x);
                }
            }
            ColumnValue::Bool(true) => self.true_count += 1,
            ColumnValue::Bool(false) => self.false_count += 1,
            ColumnValue::Str(s) => {
                if s.is_empty() {
                    self.empties += 1;
                }
                // Strictly shorter/longer only: on ties the first seen stays.
                let len = s.chars().count();
                if self
                    .shortest
                    .as_ref()
                    .is_none_or(|cur| len < cur.chars().count())
                {
                    self.shortest = Some(s.clone());
                }
                if self
                    .longest
                    .as_ref()
                    .is_none_or(|cur| len > cur.chars().count())
                {
                    self.longest = Some(s.clone());
                }
            }
            ColumnValue::Null | ColumnValue::Date(_) | ColumnValue::Timestamp(_) => {}
        }

        self.frequent.observe(value);
    }

    /// Fold the pending frequency table into the Top-K summary.
    pub fn seal(&mut self) {
        self.frequent.seal();
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.frequent.is_sealed()
    }

    /// Merge `other` into `self`. On error `self` is left unchanged.
    ///
    /// # Errors
    /// See [`check_mergeable`](Self::check_mergeable).
    pub fn merge(&mut self, other: Self) -> Result<(), ProfileError> {
        self.check_mergeable(&other)?;
        self.frequent.merge(other.frequent)?;

        self.total += other.total;
        self.nulls += other.nulls;
        self.empties += other.empties;
        self.true_count += other.true_count;
        self.false_count += other.false_count;
        self.moments.merge(&other.moments);
        self.distinct.merge(&other.distinct);

        self.min = match (self.min.take(), other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max.take(), other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.shortest = match (self.shortest.take(), other.shortest) {
            (Some(a), Some(b)) => Some(if shorter(&b, &a).is_lt() { b } else { a }),
            (a, b) => a.or(b),
        };
        self.longest = match (self.longest.take(), other.longest) {
            (Some(a), Some(b)) => Some(if shorter(&a, &b).is_lt() { b } else { a }),
            (a, b) => a.or(b),
        };
        Ok(())
    }

    /// Final statistics for the column named `name`.
    #[must_use]
    pub fn finish(mut self, name: &str) -> ColumnProfile {
        self.seal();
        let numeric = if self.kind.is_numeric() {
            self.moments.stats()
        } else {
            None
        };
        let strings = match (self.kind, self.shortest, self.longest) {
            (ColumnKind::String, Some(shortest), Some(longest)) => Some(StringStats {
                min_length: shortest.chars().count(),
                max_length: longest.chars().count(),
                shortest,
                longest,
            }),
            _ => None,
        };
        let booleans = (self.kind == ColumnKind::Boolean).then_some(BooleanStats {
            true_count: self.true_count,
            false_count: self.false_count,
        });

        ColumnProfile {
            name: name.to_owned(),
            kind: self.kind,
            total_count: self.total,
            null_count: self.nulls,
            empty_count: self.empties,
            unique_count: self.distinct.estimate_count(),
            unique_count_exact: self.distinct.is_exact(),
            min: self.min,
            max: self.max,
            numeric,
            strings,
            booleans,
            top_values: self.frequent.into_summary().to_ranked_vec(),
        }
    }
}

/* ===================== ColumnStats ===================== */

/// Statistics for a single column.
///
/// - Accumulator: [`ColumnAccumulator`]
/// - Output: [`ColumnProfile`]
#[derive(Clone, Debug)]
pub struct ColumnStats {
    pub spec: ColumnSpec,
    pub capacity: NonZeroUsize,
    pub sketch_size: usize,
}

impl ColumnStats {
    #[must_use]
    pub const fn new(spec: ColumnSpec, capacity: NonZeroUsize, sketch_size: usize) -> Self {
        Self {
            spec,
            capacity,
            sketch_size,
        }
    }

    #[must_use]
    pub fn accumulator(&self) -> ColumnAccumulator {
        ColumnAccumulator::new(self.spec.kind, self.capacity, self.sketch_size)
    }
}

impl CombineFn<ColumnValue, ColumnAccumulator, ColumnProfile> for ColumnStats {
    fn create(&self) -> ColumnAccumulator {
        self.accumulator()
    }

    fn add_input(&self, acc: &mut ColumnAccumulator, v: ColumnValue) {
        acc.observe(v);
    }

    fn merge(&self, acc: &mut ColumnAccumulator, other: ColumnAccumulator) -> Result<(), ProfileError> {
        acc.merge(other)
    }

    fn finish(&self, acc: ColumnAccumulator) -> ColumnProfile {
        acc.finish(&self.spec.name)
    }
}

impl LiftableCombiner<ColumnValue, ColumnAccumulator, ColumnProfile> for ColumnStats {
    fn build_from_group(&self, values: &[ColumnValue]) -> ColumnAccumulator {
        let mut acc = self.accumulator();
        for v in values.iter().cloned() {
            acc.observe(v);
        }
        acc.seal();
        acc
    }
}

/* ===================== RowStats ===================== */

/// Statistics for every column of a row, one [`ColumnStats`] per schema column.
///
/// Rows are expected to match the schema's arity (the profiler checks this
/// before scanning); a short row counts its missing cells as nulls and extra
/// cells are ignored.
#[derive(Clone, Debug)]
pub struct RowStats {
    pub columns: Vec<ColumnStats>,
}

impl RowStats {
    #[must_use]
    pub fn new(schema: &Schema, capacity: NonZeroUsize, sketch_size: usize) -> Self {
        Self {
            columns: schema
                .columns
                .iter()
                .cloned()
                .map(|spec| ColumnStats::new(spec, capacity, sketch_size))
                .collect(),
        }
    }

    fn observe_row(&self, acc: &mut [ColumnAccumulator], row: &Row) {
        for (i, col) in acc.iter_mut().enumerate() {
            col.observe(row.get(i).cloned().unwrap_or(ColumnValue::Null));
        }
    }
}

impl CombineFn<Row, Vec<ColumnAccumulator>, Vec<ColumnProfile>> for RowStats {
    fn create(&self) -> Vec<ColumnAccumulator> {
        self.columns.iter().map(ColumnStats::accumulator).collect()
    }

    fn add_input(&self, acc: &mut Vec<ColumnAccumulator>, row: Row) {
        self.observe_row(acc, &row);
    }

    fn merge(
        &self,
        acc: &mut Vec<ColumnAccumulator>,
        other: Vec<ColumnAccumulator>,
    ) -> Result<(), ProfileError> {
        if acc.len() != other.len() {
            return Err(ProfileError::InvalidConfig(format!(
                "cannot merge partials for {} and {} columns",
                acc.len(),
                other.len()
            )));
        }
        for (a, b) in acc.iter().zip(&other) {
            a.check_mergeable(b)?;
        }
        for (a, b) in acc.iter_mut().zip(other) {
            a.merge(b)?;
        }
        Ok(())
    }

    fn finish(&self, acc: Vec<ColumnAccumulator>) -> Vec<ColumnProfile> {
        self.columns
            .iter()
            .zip(acc)
            .map(|(col, a)| a.finish(&col.spec.name))
            .collect()
    }
}

impl LiftableCombiner<Row, Vec<ColumnAccumulator>, Vec<ColumnProfile>> for RowStats {
    fn build_from_group(&self, rows: &[Row]) -> Vec<ColumnAccumulator> {
        let mut acc: Vec<ColumnAccumulator> =
            self.columns.iter().map(ColumnStats::accumulator).collect();
        for row in rows {
            self.observe_row(&mut acc, row);
        }
        acc.iter_mut().for_each(ColumnAccumulator::seal);
        acc
    }
}
