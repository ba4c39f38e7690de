//! Finished profiles and their flat metric-row form.
//!
//! A [`ProfileReport`] holds one [`ColumnProfile`] per schema column. For
//! storage it flattens into [`MetricRow`]s, `(column, metric, value)` triples
//! keyed by [`MetricType`] names such as `TOP_N_VALUES`.

use crate::combiners::MomentStats;
use crate::config::ReportFormat;
use crate::topk::{RankedEntry, render_ranked};
use crate::value::{ColumnKind, ColumnValue};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStats {
    pub min_length: usize,
    pub max_length: usize,
    pub shortest: String,
    pub longest: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanStats {
    pub true_count: u64,
    pub false_count: u64,
}

/// Every statistic computed for one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub total_count: u64,
    pub null_count: u64,
    /// Empty strings (string columns only).
    pub empty_count: u64,
    /// Distinct non-null values; an estimate unless `unique_count_exact`.
    pub unique_count: u64,
    pub unique_count_exact: bool,
    pub min: Option<ColumnValue>,
    pub max: Option<ColumnValue>,
    /// Present for numeric columns with at least one non-null value.
    pub numeric: Option<MomentStats>,
    /// Present for string columns with at least one non-null value.
    pub strings: Option<StringStats>,
    /// Present for boolean columns.
    pub booleans: Option<BooleanStats>,
    /// Most frequent values, rank 1 first. Nulls are counted like any value.
    pub top_values: Vec<RankedEntry<ColumnValue>>,
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

impl ColumnProfile {
    #[must_use]
    pub fn perc_null(&self) -> f64 {
        percent(self.null_count, self.total_count)
    }

    #[must_use]
    pub fn perc_unique(&self) -> f64 {
        percent(self.unique_count, self.total_count)
    }

    /// Non-null cells that repeat an earlier value, as a share of all cells.
    #[must_use]
    pub fn perc_duplicate(&self) -> f64 {
        let non_null = self.total_count.saturating_sub(self.null_count);
        percent(non_null.saturating_sub(self.unique_count), self.total_count)
    }

    #[must_use]
    pub fn perc_empty(&self) -> f64 {
        percent(self.empty_count, self.total_count)
    }

    /// Ranked Top-N values rendered with `format`.
    #[must_use]
    pub fn render_top_values(&self, format: &ReportFormat) -> String {
        render_ranked(
            self.top_values
                .iter()
                .map(|e| RankedEntry::new(e.rank, &e.value, e.count)),
            format,
        )
    }

    /// Flatten into metric rows, skipping metrics that do not apply to the
    /// column's kind.
    #[must_use]
    pub fn metric_rows(&self, format: &ReportFormat) -> Vec<MetricRow> {
        let mut rows = Vec::new();
        let mut push = |metric: MetricType, value: String| {
            rows.push(MetricRow {
                column: self.name.clone(),
                metric,
                value,
            });
        };

        push(MetricType::TotalCount, self.total_count.to_string());
        push(MetricType::NullCount, self.null_count.to_string());
        push(MetricType::UniqueCount, self.unique_count.to_string());
        push(MetricType::PercNullValues, self.perc_null().to_string());
        push(MetricType::PercUniqueValues, self.perc_unique().to_string());
        push(MetricType::PercDuplicateValues, self.perc_duplicate().to_string());
        push(MetricType::TopNValues, self.render_top_values(format));
        if let Some(min) = &self.min {
            push(MetricType::Min, min.to_string());
        }
        if let Some(max) = &self.max {
            push(MetricType::Max, max.to_string());
        }
        if let Some(m) = &self.numeric {
            push(MetricType::Sum, m.sum.to_string());
            push(MetricType::Mean, m.mean.to_string());
            push(MetricType::Stddev, m.stddev.to_string());
            push(MetricType::Variance, m.variance.to_string());
        }
        if let Some(s) = &self.strings {
            push(MetricType::MinLength, s.min_length.to_string());
            push(MetricType::MaxLength, s.max_length.to_string());
            push(MetricType::ShortestString, s.shortest.clone());
            push(MetricType::LongestString, s.longest.clone());
        }
        if self.kind == ColumnKind::String {
            push(MetricType::EmptyCount, self.empty_count.to_string());
            push(MetricType::PercEmptyValues, self.perc_empty().to_string());
        }
        if let Some(b) = &self.booleans {
            push(MetricType::TrueCount, b.true_count.to_string());
            push(MetricType::FalseCount, b.false_count.to_string());
        }
        rows
    }
}

/// Metric names used in flattened output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    TotalCount,
    NullCount,
    UniqueCount,
    PercNullValues,
    PercUniqueValues,
    PercDuplicateValues,
    TopNValues,
    Min,
    Max,
    Sum,
    Mean,
    Stddev,
    Variance,
    MinLength,
    MaxLength,
    ShortestString,
    LongestString,
    EmptyCount,
    PercEmptyValues,
    TrueCount,
    FalseCount,
}

impl MetricType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TotalCount => "TOTAL_COUNT",
            Self::NullCount => "NULL_COUNT",
            Self::UniqueCount => "UNIQUE_COUNT",
            Self::PercNullValues => "PERC_NULL_VALUES",
            Self::PercUniqueValues => "PERC_UNIQUE_VALUES",
            Self::PercDuplicateValues => "PERC_DUPLICATE_VALUES",
            Self::TopNValues => "TOP_N_VALUES",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Sum => "SUM",
            Self::Mean => "MEAN",
            Self::Stddev => "STDDEV",
            Self::Variance => "VARIANCE",
            Self::MinLength => "MIN_LENGTH",
            Self::MaxLength => "MAX_LENGTH",
            Self::ShortestString => "SHORTEST_STRING",
            Self::LongestString => "LONGEST_STRING",
            Self::EmptyCount => "EMPTY_COUNT",
            Self::PercEmptyValues => "PERC_EMPTY_VALUES",
            Self::TrueCount => "TRUE_COUNT",
            Self::FalseCount => "FALSE_COUNT",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(column, metric, value)` output row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub column: String,
    pub metric: MetricType,
    pub value: String,
}

/// Result of profiling a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub row_count: u64,
    pub columns: Vec<ColumnProfile>,
}

impl ProfileReport {
    /// Profile of the column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Metric rows for every column, in schema order.
    #[must_use]
    pub fn metric_rows(&self, format: &ReportFormat) -> Vec<MetricRow> {
        self.columns
            .iter()
            .flat_map(|c| c.metric_rows(format))
            .collect()
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Fails only if a value cannot be represented in JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
