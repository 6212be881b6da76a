//! Module: config
//! Responsibility: scan tuning knobs and their TOML loading.
//! Does not own: view-engine connection settings.
//! Boundary: index handles read one `ScanConfig` at construction.

use crate::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_CAPACITY,
    error::{ErrorClass, ErrorOrigin, ScanError},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

/// Default number of sub-range bins produced by range statistics.
pub const DEFAULT_STATS_BINS: usize = 4;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ScanError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Invalid, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ScanConfig
///
/// Tuning for paginated view walks.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Rows delivered per physical fetch; each fetch asks for one extra row.
    pub batch_size: u64,

    /// Sub-range bins produced by range statistics (0 disables bins).
    pub stats_bins: usize,

    /// Capacity of each response channel.
    pub channel_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            stats_bins: DEFAULT_STATS_BINS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ScanConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be positive".into(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }
}

///
/// TESTS
///
