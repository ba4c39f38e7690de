//! Helpers for tests that build summaries and check ranked output.
//!
//! - [`summary_from_pairs`] -- a summary fed with `(value, count)` pairs in order.
//! - [`assert_ranked_eq`] -- compare a summary's ranking with expected pairs.
//! - [`sample_schema`] / [`sample_rows`] -- a small mixed-kind dataset.
//!
//! ```
//! use ironprofile::testing::{assert_ranked_eq, summary_from_pairs};
//!
//! let s = summary_from_pairs(2, [("a", 5), ("b", 5), ("c", 6)])?;
//! assert_ranked_eq(&s, &[("c", 6), ("a", 5)]);
//! # Ok::<(), ironprofile::ProfileError>(())
//! ```

use crate::combine::ProfileValue;
use crate::error::ProfileError;
use crate::schema::Schema;
use crate::topk::TopKSummary;
use crate::value::{ColumnKind, ColumnValue, Row};

/// Build a summary by calling `add` for each pair, in order.
///
/// # Errors
/// [`ProfileError::InvalidCapacity`] when `capacity` is zero.
pub fn summary_from_pairs<V, I>(capacity: usize, pairs: I) -> Result<TopKSummary<V>, ProfileError>
where
    V: ProfileValue,
    I: IntoIterator<Item = (V, i64)>,
{
    let mut summary = TopKSummary::new(capacity)?;
    for (value, count) in pairs {
        summary.add(value, count);
    }
    Ok(summary)
}

/// Assert that `summary` ranks exactly `expected`, rank 1 first.
///
/// # Panics
///
/// Panics with both rankings when they differ.
pub fn assert_ranked_eq<V: ProfileValue>(summary: &TopKSummary<V>, expected: &[(V, i64)]) {
    let actual: Vec<(V, i64)> = summary
        .ranked()
        .map(|e| (e.value.clone(), e.count))
        .collect();
    assert_eq!(
        actual.len(),
        expected.len(),
        "Ranking length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a,
            e,
            "Ranking mismatch at rank {}:\n  Expected: {expected:?}\n  Actual: {actual:?}",
            i + 1
        );
    }
}

/// Schema of [`sample_rows`]: `id` integer, `animal` string, `weight` float,
/// `tame` boolean.
#[must_use]
pub fn sample_schema() -> Schema {
    Schema::default()
        .with_column("id", ColumnKind::Integer)
        .with_column("animal", ColumnKind::String)
        .with_column("weight", ColumnKind::Float)
        .with_column("tame", ColumnKind::Boolean)
}

/// Ten rows over [`sample_schema`].
///
/// `animal` has dog x4, cat x3, null x2 and one empty string; `weight` has
/// two nulls; `tame` has one null.
#[must_use]
pub fn sample_rows() -> Vec<Row> {
    let rows: [(i64, Option<&str>, Option<f64>, Option<bool>); 10] = [
        (1, Some("dog"), Some(12.5), Some(true)),
        (2, Some("cat"), Some(4.0), Some(true)),
        (3, Some("dog"), Some(30.0), Some(false)),
        (4, None, None, Some(true)),
        (5, Some("cat"), Some(3.5), None),
        (6, Some("dog"), Some(8.0), Some(true)),
        (7, Some(""), Some(1.0), Some(false)),
        (8, Some("cat"), None, Some(true)),
        (9, None, Some(6.0), Some(false)),
        (10, Some("dog"), Some(15.0), Some(true)),
    ];
    rows.into_iter()
        .map(|(id, animal, weight, tame)| {
            vec![
                ColumnValue::from(id),
                ColumnValue::from(animal),
                ColumnValue::from(weight),
                ColumnValue::from(tame),
            ]
        })
        .collect()
}
