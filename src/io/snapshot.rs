//! Binary snapshots of Top-K summaries and sealed column partials.
//!
//! Encoding uses `postcard`. Decoding goes through the same validation as
//! any other deserialization of a [`TopKSummary`], so a snapshot that breaks
//! a summary invariant (too many items, duplicate values, zero capacity) is
//! rejected with [`ProfileError::CorruptSnapshot`].
//!
//! Unsealed accumulators are sealed as they are encoded, so a decoded
//! partial never carries a pending frequency table.

use super::ensure_parent;
use crate::combine::ProfileValue;
use crate::combiners::ColumnAccumulator;
use crate::error::ProfileError;
use crate::topk::TopKSummary;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// # Errors
/// Fails if a value cannot be serialized.
pub fn encode_summary<V>(summary: &TopKSummary<V>) -> Result<Vec<u8>>
where
    V: ProfileValue + Serialize,
{
    postcard::to_allocvec(summary).context("Failed to serialize top-k summary")
}

/// # Errors
/// [`ProfileError::CorruptSnapshot`] when the bytes do not decode to a
/// valid summary.
pub fn decode_summary<V>(bytes: &[u8]) -> Result<TopKSummary<V>, ProfileError>
where
    V: ProfileValue + DeserializeOwned,
{
    postcard::from_bytes(bytes).map_err(|e| ProfileError::CorruptSnapshot(e.to_string()))
}

/// # Errors
/// Fails if a value cannot be serialized.
pub fn encode_partials(partials: &[ColumnAccumulator]) -> Result<Vec<u8>> {
    postcard::to_allocvec(partials).context("Failed to serialize column partials")
}

/// # Errors
/// [`ProfileError::CorruptSnapshot`] when the bytes do not decode.
pub fn decode_partials(bytes: &[u8]) -> Result<Vec<ColumnAccumulator>, ProfileError> {
    postcard::from_bytes(bytes).map_err(|e| ProfileError::CorruptSnapshot(e.to_string()))
}

/// Encode `partials` into a file, creating parent directories.
///
/// # Errors
/// Fails when encoding or any file operation fails.
pub fn write_partials(path: impl AsRef<Path>, partials: &[ColumnAccumulator]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let encoded = encode_partials(partials)?;
    let mut file =
        File::create(path).with_context(|| format!("create snapshot {}", path.display()))?;
    file.write_all(&encoded)
        .with_context(|| format!("write snapshot {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync snapshot {}", path.display()))?;
    Ok(())
}

/// Load partials written by [`write_partials`].
///
/// # Errors
/// Fails when the file cannot be read or does not decode.
pub fn read_partials(path: impl AsRef<Path>) -> Result<Vec<ColumnAccumulator>> {
    let path = path.as_ref();
    let mut file = File::open(path).with_context(|| format!("open snapshot {}", path.display()))?;
    let mut encoded = Vec::new();
    file.read_to_end(&mut encoded)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let partials =
        decode_partials(&encoded).with_context(|| format!("decode snapshot {}", path.display()))?;
    Ok(partials)
}
