//! Startup configuration.
//!
//! The configuration is a JSON document read exactly once before any fetch:
//!
//! ```json
//! {
//!   "interval": 300,
//!   "timeout": 30,
//!   "sanitizer": "html",
//!   "targets": [
//!     { "name": "Changelog", "url": "https://example.com/changelog" }
//!   ]
//! }
//! ```
//!
//! The capitalized spelling used by older files (`Interval`, `Websites`,
//! `Name`, `Url`) is accepted as well.  Any problem reading, parsing or
//! validating the document is fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::sanitize::SanitizeMode;
use crate::target::Target;

/// Default location, relative to the working directory.
pub const DEFAULT_PATH: &str = "configuration.json";

/// An interval of zero would spin the loop without pause; it is raised to
/// this floor instead.
pub const MIN_INTERVAL_SECS: u64 = 1;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Process-wide parameters.  Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds between poll cycles.
    #[serde(alias = "Interval")]
    pub interval: u64,

    /// Per-request timeout in seconds.
    #[serde(alias = "Timeout", default = "default_timeout")]
    pub timeout: u64,

    #[serde(alias = "Sanitizer", default)]
    pub sanitizer: SanitizeMode,

    /// Pages to watch, in poll order.
    #[serde(alias = "Websites", alias = "websites")]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Url")]
    pub url: String,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Read, parse and validate the document at `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&raw)
}

/// Parse and validate a document already in memory.
pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(raw)?;
    config.validate()?;
    if config.interval < MIN_INTERVAL_SECS {
        warn!(
            configured = config.interval,
            used = MIN_INTERVAL_SECS,
            "Interval below minimum, clamping"
        );
    }
    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::Invalid("no targets configured".into()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be at least one second".into()));
        }
        for (i, target) in self.targets.iter().enumerate() {
            if target.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("target #{} has an empty name", i + 1)));
            }
            let url = Url::parse(&target.url).map_err(|e| {
                ConfigError::Invalid(format!("{}: bad url {:?}: {e}", target.name, target.url))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "{}: unsupported scheme {:?}",
                    target.name,
                    url.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Sleep between cycles, never shorter than [`MIN_INTERVAL_SECS`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(MIN_INTERVAL_SECS))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Fresh targets with empty snapshots, in configured order.
    pub fn build_targets(&self) -> Vec<Target> {
        self.targets
            .iter()
            .map(|t| Target::new(t.name.as_str(), t.url.as_str()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
