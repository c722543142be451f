//! Configuration management for the retro ROM organizer
//!
//! Holds the matching thresholds, scan limits, and placement policy.
//! Configuration lives in TOML files; every field has a default.

mod matching;
mod settings;

pub use matching::MatchConfig;
pub use settings::{DownloadConfig, PlacementConfig, ScanSettings};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/retro-builder";
pub const USER_CONFIG_FILE: &str = "retro-builder.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub matching: MatchConfig,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub placement: PlacementConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

impl BuilderConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the system config overlaid with the working-directory config
    pub fn load_default() -> Result<Self, ConfigError> {
        let system_config = Path::new(CONFIG_DIR).join("config.toml");
        Self::load_layered(&[system_config, PathBuf::from(USER_CONFIG_FILE)])
    }

    /// Merge existing files in order, later files overriding earlier ones
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged: Option<toml::Value> = None;

        for path in paths.iter().filter(|p| p.exists()) {
            let contents = std::fs::read_to_string(path)?;
            let value: toml::Value = toml::from_str(&contents)?;
            tracing::debug!("Loaded configuration layer {}", path.display());
            match merged.as_mut() {
                Some(base) => merge_toml(base, value),
                None => merged = Some(value),
            }
        }

        let Some(value) = merged else {
            tracing::warn!("No configuration file found, using defaults");
            return Ok(Self::default());
        };

        let config: Self = value.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.matching.scores() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "matching.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.scan.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "scan.max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
