//! Profiler configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```json
//! { "top_n": 5, "format": { "field_delimiter": "|", "record_delimiter": ";" } }
//! ```

use crate::error::ProfileError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Default Top-K capacity per column.
pub const DEFAULT_TOP_N: usize = 3;

/// Default KMV sketch size for unique-count estimates.
pub const DEFAULT_DISTINCT_SKETCH_SIZE: usize = 1024;

/// Delimiters used when rendering ranked Top-K entries as text.
///
/// Each entry renders as `rank<field>value<field>count<record>`. The same
/// format must be used for every column of a run so the output stays
/// machine-parseable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFormat {
    pub field_delimiter: String,
    pub record_delimiter: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            field_delimiter: "^A".to_owned(),
            record_delimiter: "^B".to_owned(),
        }
    }
}

impl ReportFormat {
    pub fn new(field_delimiter: impl Into<String>, record_delimiter: impl Into<String>) -> Self {
        Self {
            field_delimiter: field_delimiter.into(),
            record_delimiter: record_delimiter.into(),
        }
    }
}

/// Settings for a profiling run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Number of most frequent values kept per column.
    pub top_n: usize,
    /// Text format for ranked Top-K output.
    pub format: ReportFormat,
    /// Partition count for parallel runs; `None` uses the runner default.
    pub partitions: Option<usize>,
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Max partials merged per reduce round; `None` merges all at once.
    pub fanout: Option<usize>,
    /// KMV sketch size used to estimate unique counts.
    pub distinct_sketch_size: usize,
    /// Profile on the calling thread with a single partition.
    pub sequential: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            format: ReportFormat::default(),
            partitions: None,
            threads: None,
            fanout: None,
            distinct_sketch_size: DEFAULT_DISTINCT_SKETCH_SIZE,
            sequential: false,
        }
    }
}

impl ProfilerConfig {
    /// Load a config from a JSON file; missing keys take their defaults.
    ///
    /// # Errors
    /// Fails when the file cannot be read, is not valid JSON, or does not
    /// pass [`validate`](Self::validate).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Self =
            serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("validate config {}", path.display()))?;
        Ok(cfg)
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = Some(partitions);
        self
    }

    #[must_use]
    pub fn with_fanout(mut self, fanout: usize) -> Self {
        self.fanout = Some(fanout);
        self
    }

    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }

    /// Top-K capacity as a validated non-zero value.
    ///
    /// # Errors
    /// [`ProfileError::InvalidCapacity`] when `top_n` is zero.
    pub fn capacity(&self) -> Result<NonZeroUsize, ProfileError> {
        NonZeroUsize::new(self.top_n).ok_or(ProfileError::InvalidCapacity(self.top_n))
    }

    /// Check every setting.
    ///
    /// # Errors
    /// [`ProfileError::InvalidCapacity`] for a zero `top_n`, otherwise
    /// [`ProfileError::InvalidConfig`] for the first out-of-range setting.
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.capacity()?;
        if self.partitions == Some(0) {
            return Err(ProfileError::InvalidConfig("partitions must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(ProfileError::InvalidConfig("threads must be at least 1".into()));
        }
        if let Some(f) = self.fanout
            && f < 2
        {
            return Err(ProfileError::InvalidConfig(format!(
                "fanout must be at least 2, got {f}"
            )));
        }
        if self.distinct_sketch_size < 2 {
            return Err(ProfileError::InvalidConfig(format!(
                "distinct_sketch_size must be at least 2, got {}",
                self.distinct_sketch_size
            )));
        }
        if self.format.field_delimiter.is_empty() || self.format.record_delimiter.is_empty() {
            return Err(ProfileError::InvalidConfig("delimiters must not be empty".into()));
        }
        Ok(())
    }
}
