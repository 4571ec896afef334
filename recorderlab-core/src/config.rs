//! TOML configuration for the recorder and its terminal view.
//!
//! Every section and field is optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::FlushInterval;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderLabConfig {
    pub recorder: RecorderConfig,
    pub view: ViewConfig,
    pub feed: FeedConfig,
}

/// Local recording engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Seconds between periodic status snapshots.
    pub flush_interval_secs: u32,
    /// JSON file holding the recording set across restarts.
    pub settings_path: Option<PathBuf>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: FlushInterval::default().secs(),
            settings_path: None,
        }
    }
}

/// Terminal view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Input poll timeout per frame; also the bridge drain cadence.
    pub tick_rate_ms: u64,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            log_filter: "info".into(),
            log_file: PathBuf::from("recorderlab.log"),
        }
    }
}

/// Demo contract discovery feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Mean delay between discoveries.
    pub interval_ms: u64,
    /// Contracts announced before the view starts.
    pub initial_contracts: usize,
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 1500,
            initial_contracts: 4,
            seed: None,
        }
    }
}

impl RecorderLabConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        FlushInterval::try_from(self.recorder.flush_interval_secs).map_err(ConfigError::Invalid)?;
        if self.view.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid("view.tick_rate_ms must be positive".into()));
        }
        if self.feed.enabled && self.feed.interval_ms == 0 {
            return Err(ConfigError::Invalid("feed.interval_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = RecorderLabConfig::from_toml("").unwrap();
        assert_eq!(config, RecorderLabConfig::default());
        assert_eq!(config.recorder.flush_interval_secs, 10);
        assert_eq!(config.view.tick_rate_ms, 50);
    }

    #[test]
    fn partial_sections_override_fields() {
        let config = RecorderLabConfig::from_toml(
            r#"
            [recorder]
            flush_interval_secs = 30
            settings_path = "recorder.json"

            [feed]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.recorder.flush_interval_secs, 30);
        assert_eq!(config.recorder.settings_path, Some(PathBuf::from("recorder.json")));
        assert!(!config.feed.enabled);
        assert_eq!(config.feed.interval_ms, 1500);
        assert_eq!(config.view.log_filter, "info");
    }

    #[test]
    fn out_of_range_interval_is_rejected() {
        let err = RecorderLabConfig::from_toml("[recorder]\nflush_interval_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RecorderLabConfig::from_toml("[recorder]\nflush_interval_secs = 61\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = RecorderLabConfig::from_toml("[recorder\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RecorderLabConfig::from_file(Path::new("/nonexistent/recorderlab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
