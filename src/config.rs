//! Configuration file support.
//!
//! Settings are stored as JSON and every field falls back to its default
//! when absent, so partial files are valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::ThresholdOptions;
use crate::constants::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};
use crate::data::ResizeFilter;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Width of the box source images are fitted into
    pub frame_width: u32,

    /// Height of the box source images are fitted into
    pub frame_height: u32,

    /// Resampling filter used while fitting
    pub resize_filter: ResizeFilter,

    /// Threshold histogram scope and tie placement
    pub threshold: ThresholdOptions,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            resize_filter: ResizeFilter::default(),
            threshold: ThresholdOptions::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if config.frame_width == 0 || config.frame_height == 0 {
            return Err(ConfigError::InvalidFrameSize {
                width: config.frame_width,
                height: config.frame_height,
            });
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "mitodisp-config.json"
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Working frame box has a zero side
    #[error("Invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ThresholdPlacement, ThresholdScope};

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::new();
        assert_eq!(config.frame_width, 600);
        assert_eq!(config.frame_height, 600);
        assert_eq!(config.threshold.scope, ThresholdScope::ZeroedFrame);
        assert_eq!(config.threshold.placement, ThresholdPlacement::PlateauMidpoint);
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AnalysisConfig::from_json(
            r#"{ "threshold": { "scope": "roi_only" }, "log_level": "debug" }"#,
        )
        .unwrap();

        assert_eq!(config.threshold.scope, ThresholdScope::RoiOnly);
        assert_eq!(config.threshold.placement, ThresholdPlacement::PlateauMidpoint);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.frame_width, 600);
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = AnalysisConfig::new();
        config.frame_width = 800;
        config.resize_filter = ResizeFilter::Lanczos3;
        config.threshold.placement = ThresholdPlacement::Lowest;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"lanczos3\""));
        assert_eq!(AnalysisConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { file_version: 99, .. }));
    }

    #[test]
    fn test_zero_frame_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "frame_width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFrameSize { .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AnalysisConfig::from_json("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
