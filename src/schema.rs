//! Dataset schema: column names and kinds, plus raw-field parsing.

use crate::error::ProfileError;
use crate::value::{ColumnKind, ColumnValue, Row};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted timestamp layouts, tried in order. `%.f` also matches no fraction.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// One column of a [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Parse a raw text field as this column's kind.
    ///
    /// Empty fields are `Null` for every kind except `String`, where they stay
    /// empty strings (and are counted as such by the profiler).
    ///
    /// # Errors
    /// [`ProfileError::ParseValue`] when a non-empty field does not parse.
    pub fn parse_field(&self, raw: &str) -> Result<ColumnValue, ProfileError> {
        if self.kind == ColumnKind::String {
            return Ok(ColumnValue::Str(raw.to_owned()));
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(ColumnValue::Null);
        }
        let parsed = match self.kind {
            ColumnKind::Integer => trimmed.parse::<i64>().ok().map(ColumnValue::Int),
            ColumnKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .map(|f| ColumnValue::Float(OrderedFloat(f))),
            ColumnKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Some(ColumnValue::Bool(true)),
                "false" => Some(ColumnValue::Bool(false)),
                _ => None,
            },
            ColumnKind::Date => parse_date(trimmed).map(ColumnValue::Date),
            ColumnKind::Timestamp => parse_timestamp(trimmed).map(ColumnValue::Timestamp),
            ColumnKind::String => Some(ColumnValue::Str(raw.to_owned())),
        };
        parsed.ok_or_else(|| ProfileError::ParseValue {
            column: self.name.clone(),
            kind: self.kind.name(),
            raw: raw.to_owned(),
        })
    }
}

/// Ordered list of columns describing every row of a dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    #[must_use]
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Builder-style column append.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec::new(name, kind));
        self
    }

    /// Load a schema from a JSON file of the form `{"columns": [{"name": .., "kind": ..}]}`.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not a valid schema document.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read schema {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse schema {}", path.display()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the column named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check that every cell of `row` fits its column's kind.
    ///
    /// # Errors
    /// [`ProfileError::SchemaMismatch`] on arity mismatch, otherwise
    /// [`ProfileError::ParseValue`] for the first cell of the wrong kind.
    pub fn check_row(&self, row_index: usize, row: &[ColumnValue]) -> Result<(), ProfileError> {
        self.check_arity(row_index, row.len())?;
        match self
            .columns
            .iter()
            .zip(row)
            .find(|(col, value)| !value.matches_kind(col.kind))
        {
            Some((col, value)) => Err(ProfileError::ParseValue {
                column: col.name.clone(),
                kind: col.kind.name(),
                raw: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Parse one record of raw fields into a typed row.
    ///
    /// # Errors
    /// [`ProfileError::SchemaMismatch`] on arity mismatch, otherwise the first
    /// field parse failure.
    pub fn parse_record<'a, I>(&self, row_index: usize, fields: I) -> Result<Row, ProfileError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        self.check_arity(row_index, fields.len())?;
        self.columns
            .iter()
            .zip(fields)
            .map(|(col, raw)| col.parse_field(raw))
            .collect()
    }

    /// # Errors
    /// [`ProfileError::SchemaMismatch`] when `found` differs from the column count.
    pub fn check_arity(&self, row: usize, found: usize) -> Result<(), ProfileError> {
        if found == self.columns.len() {
            Ok(())
        } else {
            Err(ProfileError::SchemaMismatch {
                row,
                expected: self.columns.len(),
                found,
            })
        }
    }
}
