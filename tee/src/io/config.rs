//! Engine configuration, optionally loaded from a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::buffer::{DEFAULT_COMPACT_THRESHOLD, LineBuffer};
use crate::core::retry::{DEFAULT_RETRY_LIMIT, RetryPolicy};

/// Tee configuration (TOML).
///
/// Missing fields take their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TeeConfig {
    /// Consecutive failures tolerated per read or write before giving up.
    pub retry_limit: u32,

    /// Consumed bytes the line buffer keeps before sliding its window.
    pub compact_threshold: usize,
}

impl Default for TeeConfig {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl TeeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.retry_limit == 0 {
            return Err(anyhow!("retry_limit must be > 0"));
        }
        if self.compact_threshold == 0 {
            return Err(anyhow!("compact_threshold must be > 0"));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_limit)
    }

    pub fn line_buffer(&self) -> LineBuffer {
        LineBuffer::new(self.compact_threshold)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TeeConfig::default()`.
pub fn load_config(path: &Path) -> Result<TeeConfig> {
    if !path.exists() {
        let cfg = TeeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TeeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
