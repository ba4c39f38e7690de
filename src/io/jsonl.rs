//! JSON Lines input, metric output, and whole-report JSON.
//!
//! Input lines are JSON objects keyed by column name. A missing key or a JSON
//! `null` is a null cell; other values must match the column's kind, except
//! that strings are accepted for every kind and parsed like CSV fields. Dates
//! and timestamps have no JSON type and must be strings.

use super::ensure_parent;
use crate::error::ProfileError;
use crate::report::{MetricRow, ProfileReport};
use crate::schema::{ColumnSpec, Schema};
use crate::value::{ColumnKind, ColumnValue, Row};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Read a JSONL file into typed rows. Blank lines are skipped and do not
/// count as rows.
///
/// # Errors
/// Fails when the file cannot be read, a line is not a JSON object, or a
/// value does not fit its column.
pub fn read_jsonl_rows(path: impl AsRef<Path>, schema: &Schema) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = BufReader::new(f);
    let mut out = Vec::new();
    for (i, line) in rdr.lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", i + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let obj: Map<String, Value> = serde_json::from_str(&line).with_context(|| {
            format!("parse JSONL line {} in {}: {}", i + 1, path.display(), line)
        })?;
        let row = schema
            .columns
            .iter()
            .map(|col| cell(col, obj.get(&col.name)))
            .collect::<Result<Row, ProfileError>>()
            .with_context(|| format!("JSONL line {} in {}", i + 1, path.display()))?;
        out.push(row);
    }
    debug!(rows = out.len(), path = %path.display(), "read jsonl");
    Ok(out)
}

fn cell(col: &ColumnSpec, value: Option<&Value>) -> Result<ColumnValue, ProfileError> {
    let mismatch = |v: &Value| ProfileError::ParseValue {
        column: col.name.clone(),
        kind: col.kind.name(),
        raw: v.to_string(),
    };
    match (col.kind, value) {
        (_, None | Some(Value::Null)) => Ok(ColumnValue::Null),
        (_, Some(Value::String(s))) => col.parse_field(s),
        (ColumnKind::Integer, Some(v)) => v.as_i64().map(ColumnValue::from).ok_or_else(|| mismatch(v)),
        (ColumnKind::Float, Some(v)) => v.as_f64().map(ColumnValue::from).ok_or_else(|| mismatch(v)),
        (ColumnKind::Boolean, Some(v)) => v.as_bool().map(ColumnValue::from).ok_or_else(|| mismatch(v)),
        (ColumnKind::String, Some(v)) => Ok(ColumnValue::Str(v.to_string())),
        (ColumnKind::Date | ColumnKind::Timestamp, Some(v)) => Err(mismatch(v)),
    }
}

/// Write metric rows as JSONL, one object per row.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Fails when the file cannot be created or written.
pub fn write_metrics_jsonl(path: impl AsRef<Path>, rows: &[MetricRow]) -> Result<usize> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (i, row) in rows.iter().enumerate() {
        serde_json::to_writer(&mut w, row)
            .with_context(|| format!("serialize row #{} to {}", i, path.display()))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(rows.len())
}

/// Write a whole report as pretty-printed JSON.
///
/// # Errors
/// Fails when the file cannot be created or written.
pub fn write_report_json(path: impl AsRef<Path>, report: &ProfileReport) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, report)
        .with_context(|| format!("serialize report to {}", path.display()))?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_follow_column_kind() {
        let int = ColumnSpec::new("n", ColumnKind::Integer);
        assert_eq!(cell(&int, Some(&json!(7))).unwrap(), ColumnValue::Int(7));
        assert_eq!(cell(&int, Some(&json!("8"))).unwrap(), ColumnValue::Int(8));
        assert_eq!(cell(&int, None).unwrap(), ColumnValue::Null);
        assert!(cell(&int, Some(&json!(1.5))).is_err());

        let s = ColumnSpec::new("s", ColumnKind::String);
        assert_eq!(cell(&s, Some(&json!(12))).unwrap(), ColumnValue::Str("12".into()));
        assert_eq!(cell(&s, Some(&Value::Null)).unwrap(), ColumnValue::Null);
    }

    #[test]
    fn dates_come_from_strings_only() {
        let date = ColumnSpec::new("joindate", ColumnKind::Date);
        let d = chrono::NaiveDate::from_ymd_opt(1990, 10, 25).unwrap();
        assert_eq!(cell(&date, Some(&json!("1990-10-25"))).unwrap(), ColumnValue::Date(d));
        assert!(cell(&date, Some(&json!(19901025))).is_err());
    }
}
