//! File input and output for profiling runs.
//!
//! - [`csv`] -- typed rows from delimited text, metric rows out (feature `io-csv`).
//! - [`jsonl`] -- typed rows from JSON Lines, metric rows and reports out
//!   (feature `io-jsonl`).
//! - [`snapshot`] -- compact binary snapshots of summaries and partials for
//!   shipping between workers (feature `snapshots`).

use anyhow::{Context, Result};
use std::fs::create_dir_all;
use std::path::Path;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

#[cfg_attr(docsrs, doc(cfg(feature = "snapshots")))]
#[cfg(feature = "snapshots")]
pub mod snapshot;

/// Create the parent directories of `path`, if any.
#[allow(dead_code)]
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    Ok(())
}
