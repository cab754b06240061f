//! Tracker configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file exists.

use levelwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level tracker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Milestone detection parameters.
    pub milestones: MilestoneConfig,
    /// Store lifecycle parameters.
    pub tracking: TrackingConfig,
    /// Export document parameters.
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    /// A level increase must strictly exceed this to count as a milestone.
    pub threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Whether a freshly built store accepts snapshots before `enable()`.
    pub start_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Indent exported JSON documents.
    pub pretty: bool,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            threshold: crate::detect::LEVEL_LEAP_THRESHOLD,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl TrackerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} — using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load config from a TOML file, failing on a missing or malformed file.
    /// Used when the caller named the file explicitly.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("read {}: {}", path.display(), e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("parse {}: {}", path.display(), e)))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render the config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
