//! Column profiling over typed rows.
//!
//! [`Profiler::profile`] does the whole job in one call. Callers that scan
//! partitions themselves (separate processes, or files read in pieces) use
//! [`Profiler::scan_partition`] per partition, ship the sealed partials
//! (see [`io::snapshot`](crate::io::snapshot)) and finish with
//! [`Profiler::combine_partials`].

use crate::combine::{CombineFn, LiftableCombiner};
use crate::combiners::{ColumnAccumulator, RowStats};
use crate::config::ProfilerConfig;
use crate::error::ProfileError;
use crate::report::{ColumnProfile, ProfileReport};
use crate::runner::{ExecMode, Runner};
use crate::schema::Schema;
use crate::value::Row;
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct Profiler {
    config: ProfilerConfig,
    runner: Runner,
}

impl Profiler {
    /// # Errors
    /// The first setting rejected by [`ProfilerConfig::validate`].
    pub fn new(config: ProfilerConfig) -> Result<Self, ProfileError> {
        config.validate()?;
        let mode = if config.sequential {
            ExecMode::Sequential
        } else {
            ExecMode::Parallel {
                threads: config.threads,
                partitions: config.partitions,
            }
        };
        let runner = Runner {
            mode,
            fanout: config.fanout,
            ..Runner::default()
        };
        Ok(Self { config, runner })
    }

    #[must_use]
    pub const fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    #[must_use]
    pub const fn runner(&self) -> &Runner {
        &self.runner
    }

    fn combiner(&self, schema: &Schema) -> Result<RowStats, ProfileError> {
        Ok(RowStats::new(
            schema,
            self.config.capacity()?,
            self.config.distinct_sketch_size,
        ))
    }

    /// Profile every column of `rows`.
    ///
    /// # Errors
    /// [`ProfileError::SchemaMismatch`] for the first row whose arity differs
    /// from the schema, [`ProfileError::ParseValue`] for a cell whose variant
    /// does not fit its column, or a worker pool / merge failure.
    pub fn profile(&self, schema: &Schema, rows: Vec<Row>) -> Result<ProfileReport> {
        for (i, row) in rows.iter().enumerate() {
            schema.check_row(i, row)?;
        }
        let row_count = rows.len() as u64;
        info!(rows = row_count, columns = schema.len(), "profiling");

        let comb = self.combiner(schema)?;
        let columns: Vec<ColumnProfile> = self
            .runner
            .combine_globally(rows, &comb)
            .context("profile rows")?;
        for col in &columns {
            debug!(column = %col.name, nulls = col.null_count, unique = col.unique_count, "column done");
        }
        Ok(ProfileReport { row_count, columns })
    }

    /// Sealed per-column partials for one partition of rows.
    ///
    /// # Errors
    /// [`ProfileError::SchemaMismatch`] or [`ProfileError::ParseValue`] for a
    /// row that does not fit the schema; the reported row index is relative
    /// to `rows`.
    pub fn scan_partition(
        &self,
        schema: &Schema,
        rows: &[Row],
    ) -> Result<Vec<ColumnAccumulator>, ProfileError> {
        for (i, row) in rows.iter().enumerate() {
            schema.check_row(i, row)?;
        }
        debug!(rows = rows.len(), "scanning partition");
        Ok(self.combiner(schema)?.build_from_group(rows))
    }

    /// Reduce partials produced by [`scan_partition`](Self::scan_partition)
    /// into a report. No partials yields an empty report.
    ///
    /// # Errors
    /// [`ProfileError::InvalidConfig`] when a partial does not match the
    /// schema, [`ProfileError::CapacityMismatch`] when a partial was scanned
    /// with a different `top_n` than this profiler's, or the first merge
    /// failure.
    pub fn combine_partials(
        &self,
        schema: &Schema,
        partials: Vec<Vec<ColumnAccumulator>>,
    ) -> Result<ProfileReport> {
        let capacity = self.config.capacity()?.get();
        for (p, partial) in partials.iter().enumerate() {
            check_partial(schema, capacity, partial).with_context(|| format!("partial #{p}"))?;
        }
        info!(partials = partials.len(), "combining partials");

        let comb = self.combiner(schema)?;
        let acc = self
            .runner
            .reduce_partials::<Row, RowStats, Vec<ColumnAccumulator>, Vec<ColumnProfile>>(
                partials, &comb,
            )?;
        let row_count = acc.first().map_or(0, ColumnAccumulator::total);
        Ok(ProfileReport {
            row_count,
            columns: CombineFn::<Row, _, _>::finish(&comb, acc),
        })
    }
}

fn check_partial(
    schema: &Schema,
    capacity: usize,
    partial: &[ColumnAccumulator],
) -> Result<(), ProfileError> {
    if partial.len() != schema.len() {
        return Err(ProfileError::InvalidConfig(format!(
            "partial has {} columns, schema has {}",
            partial.len(),
            schema.len()
        )));
    }
    for (acc, spec) in partial.iter().zip(&schema.columns) {
        if acc.kind() != spec.kind {
            return Err(ProfileError::InvalidConfig(format!(
                "column `{}` is {} in the schema but {} in the partial",
                spec.name,
                spec.kind,
                acc.kind()
            )));
        }
        if acc.capacity() != capacity {
            return Err(ProfileError::CapacityMismatch {
                left: capacity,
                right: acc.capacity(),
            });
        }
    }
    Ok(())
}
