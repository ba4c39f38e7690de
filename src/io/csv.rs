//! CSV input and metric output.
//!
//! Rows are read as raw text records and typed through the [`Schema`]; the
//! reader is flexible about record length so a short or long record surfaces
//! as [`ProfileError::SchemaMismatch`] with its row number rather than as a
//! CSV error.

use super::ensure_parent;
use crate::error::ProfileError;
use crate::report::MetricRow;
use crate::schema::Schema;
use crate::value::Row;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Read a CSV file into typed rows.
///
/// With `has_headers`, the header row must name the schema's columns in
/// order (surrounding whitespace ignored).
///
/// # Errors
/// Fails when the file cannot be opened, the header does not match the
/// schema, a record has the wrong number of fields, or a field cannot be
/// parsed as its column's kind. Row numbers in errors are 0-based and exclude
/// the header.
pub fn read_csv_rows(path: impl AsRef<Path>, schema: &Schema, has_headers: bool) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(f);

    if has_headers {
        let headers = rdr
            .headers()
            .with_context(|| format!("read header of {}", path.display()))?;
        check_headers(schema, headers).with_context(|| format!("header of {}", path.display()))?;
    }

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("read CSV record #{}", i + 1))?;
        let row = schema
            .parse_record(i, rec.iter())
            .with_context(|| format!("parse CSV record #{} in {}", i + 1, path.display()))?;
        out.push(row);
    }
    debug!(rows = out.len(), path = %path.display(), "read csv");
    Ok(out)
}

fn check_headers(schema: &Schema, headers: &StringRecord) -> Result<(), ProfileError> {
    let names: Vec<&str> = headers.iter().map(str::trim).collect();
    let expected: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
    if names == expected {
        Ok(())
    } else {
        Err(ProfileError::InvalidConfig(format!(
            "header {names:?} does not match schema columns {expected:?}"
        )))
    }
}

/// Write metric rows as CSV with a `column,metric,value` header.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Fails when the file cannot be created or written.
pub fn write_metrics_csv(path: impl AsRef<Path>, rows: &[MetricRow]) -> Result<usize> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(f);
    for (i, row) in rows.iter().enumerate() {
        wtr.serialize(row)
            .with_context(|| format!("serialize CSV row #{}", i + 1))?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
