//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in
//! a config file:
//!
//! ```toml
//! # daqfile.toml
//! [resample]
//! max_points = 4000
//!
//! [derive]
//! parallel = true
//!
//! [output]
//! json = false
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Target point count when neither flag nor config sets one
pub const DEFAULT_MAX_POINTS: u32 = 2000;

/// Root configuration structure for daqfile.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Resampling defaults.
    #[serde(default)]
    pub resample: ResampleConfig,

    /// Derived-channel settings.
    #[serde(default)]
    pub derive: DeriveSection,

    /// Output formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for the resample command.
#[derive(Debug, Default, Deserialize)]
pub struct ResampleConfig {
    /// Target number of points per view.
    pub max_points: Option<u32>,
}

/// Configuration for the derivation pass.
#[derive(Debug, Default, Deserialize)]
pub struct DeriveSection {
    /// Evaluate independent derived channels concurrently.
    pub parallel: Option<bool>,
}

/// Configuration for report output.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON instead of text tables.
    pub json: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Resolve the point budget: flag, then file, then default.
    pub fn max_points(&self, flag: Option<u32>) -> u32 {
        flag.or(self.resample.max_points).unwrap_or(DEFAULT_MAX_POINTS)
    }
}
