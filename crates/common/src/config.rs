//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GazefixError, GazefixResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default fixation detection parameters.
    #[serde(default)]
    pub detection: DetectionDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do with a fixation that is still open when the input ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailingPolicy {
    /// Drop the open fixation, as classic I-DT does.
    #[default]
    Discard,
    /// Emit the open fixation window as a final record.
    Flush,
}

/// Default I-DT parameters.
///
/// The defaults were determined empirically on HoloLens 2 recordings; tune
/// them for the sampling rate and task at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionDefaults {
    /// Samples required before a candidate window is tested.
    /// Roughly the minimum fixation duration (~0.08 s) times the sample rate.
    pub min_points_per_fixation: usize,

    /// Dispersion a candidate window must stay under to start a fixation.
    pub min_fixation_size: f64,

    /// Dispersion an active fixation must stay under to continue.
    pub max_fixation_size: f64,

    /// End-of-stream handling for an open fixation.
    pub trailing: TrailingPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazefix_fixation_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for DetectionDefaults {
    fn default() -> Self {
        Self {
            min_points_per_fixation: 2,
            min_fixation_size: 0.047,
            max_fixation_size: 0.095,
            trailing: TrailingPolicy::Discard,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> GazefixResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GazefixError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> GazefixResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> GazefixResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazefix").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_defaults() {
        let d = DetectionDefaults::default();
        assert_eq!(d.min_points_per_fixation, 2);
        assert!((d.min_fixation_size - 0.047).abs() < 1e-12);
        assert!((d.max_fixation_size - 0.095).abs() < 1e-12);
        assert_eq!(d.trailing, TrailingPolicy::Discard);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{"detection":{"min_points_per_fixation":6}}"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.detection.min_points_per_fixation, 6);
        assert!((config.detection.max_fixation_size - 0.095).abs() < 1e-12);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_trailing_policy_serializes_snake_case() {
        let json = serde_json::to_string(&TrailingPolicy::Flush).unwrap();
        assert_eq!(json, "\"flush\"");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("gazefix_test_config_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.detection.min_fixation_size = 0.03;
        config.logging.json = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_missing_path() {
        let path = 
            std::env::temp_dir().join(format!("gazefix_missing_{}.json", std::process::id()));
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, GazefixError::FileNotFound { .. }));
    }
}
