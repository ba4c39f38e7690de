//! # Ironprofile
//!
//! Column-level **data profiling** for Rust. Every column of a dataset gets
//! counts, null and unique statistics, numeric moments, string lengths and a
//! ranked list of its most frequent values, computed in one partitioned pass
//! and merged in parallel.
//!
//! ## Key Features
//!
//! - **Bounded Top-K summaries** - [`TopKSummary`] keeps at most K values per
//!   column, whatever the cardinality, and merges across partitions
//! - **Deterministic ties** - among equal counts the value seen first wins
//! - **Mergeable combiners** - every statistic is a [`CombineFn`] folded per
//!   partition and reduced with a linear or tree-shaped merge
//! - **Sequential and parallel execution** - [`Runner`] on the calling thread
//!   or a Rayon pool
//! - **I/O** - CSV and JSON Lines input, metric-row output, and binary
//!   snapshots of partials (all optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use ironprofile::testing::{sample_rows, sample_schema};
//! use ironprofile::{ColumnValue, Profiler, ProfilerConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let profiler = Profiler::new(ProfilerConfig::default().with_top_n(2).sequential())?;
//! let report = profiler.profile(&sample_schema(), sample_rows())?;
//!
//! let animal = report.column("animal").expect("column exists");
//! assert_eq!(animal.null_count, 2);
//! assert_eq!(animal.top_values[0].value, ColumnValue::from("dog"));
//! assert_eq!(animal.top_values[0].count, 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Top-K summary
//!
//! [`TopKSummary::add`] records a value with its cumulative count. A full
//! summary admits a new value only if it strictly beats the lowest retained
//! count, and then evicts that item. [`TopKSummary::merge`] sums the counts
//! of shared values and keeps the top K of the union.
//!
//! ### Combiners
//!
//! A [`CombineFn`] has four steps: `create`, `add_input`, `merge`, `finish`.
//! [`LiftableCombiner`] lets the runner build a partition's accumulator from
//! the whole partition at once. The [`combiners`] module has the built-ins:
//! Top-K frequency, approximate distinct count, moments, and whole-column or
//! whole-row statistics.
//!
//! ### Profiler
//!
//! [`Profiler`] ties a [`Schema`] and a [`ProfilerConfig`] to a [`Runner`]
//! and produces a [`ProfileReport`]. For distributed scans use
//! [`Profiler::scan_partition`] on each worker and
//! [`Profiler::combine_partials`] on the coordinator.
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV row input and metric output
//! - `io-jsonl` - JSON Lines row input, metric and report output
//! - `snapshots` - postcard snapshots of summaries and partials
//! - `cli` - the `ironprofile` binary

pub mod combine;
pub mod combiners;
pub mod config;
pub mod error;
pub mod io;
pub mod profiler;
pub mod reduce;
pub mod report;
pub mod runner;
pub mod schema;
pub mod testing;
pub mod topk;
pub mod value;

// General re-exports
pub use combine::{CombineFn, Count, LiftableCombiner, ProfileValue};
pub use config::{ProfilerConfig, ReportFormat};
pub use error::ProfileError;
pub use profiler::Profiler;
pub use report::{BooleanStats, ColumnProfile, MetricRow, MetricType, ProfileReport, StringStats};
pub use runner::{ExecMode, Runner};
pub use schema::{ColumnSpec, Schema};
pub use topk::{RankedEntry, TopKItem, TopKSummary};
pub use value::{ColumnKind, ColumnValue, Row};

// Gated re-exports
#[cfg(feature = "io-csv")]
pub use io::csv::{read_csv_rows, write_metrics_csv};

#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{read_jsonl_rows, write_metrics_jsonl, write_report_json};
