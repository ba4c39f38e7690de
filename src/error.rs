//! Typed failures raised by summaries, combiners, and schema handling.
//!
//! Pipeline-level entry points ([`Runner`](crate::Runner),
//! [`Profiler`](crate::Profiler), the `io` module) return `anyhow::Result` and
//! wrap these with context; use `err.downcast_ref::<ProfileError>()` to match
//! on the underlying variant.

use thiserror::Error;

/// Errors produced by the profiling core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// A Top-K capacity of zero was requested.
    #[error("top-k capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// Two summaries with different capacities were merged.
    #[error("cannot merge top-k summaries of capacity {left} and {right}")]
    CapacityMismatch { left: usize, right: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A row does not have one field per schema column.
    #[error("row {row} has {found} fields but the schema has {expected} columns")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A raw field could not be parsed as the column's kind.
    #[error("column `{column}`: cannot parse {raw:?} as {kind}")]
    ParseValue {
        column: String,
        kind: &'static str,
        raw: String,
    },

    /// A decoded snapshot violates a summary invariant.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// The rayon worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
