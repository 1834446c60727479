// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors loading or saving an [`EngineConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this config
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Engine settings.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluation passes a host runs per frame
    pub max_passes_per_frame: u32,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// `(width, height)` of newly created noise nodes
    pub default_canvas: (u32, u32),
    /// Seed of newly created noise nodes
    pub noise_seed: u64,
    /// Log a warning when cached artifacts exceed this many bytes
    pub warn_cache_bytes: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes_per_frame: 1,
            log_filter: "pixelflow=info".to_string(),
            default_canvas: (256, 256),
            noise_seed: 0,
            warn_cache_bytes: None,
        }
    }
}

impl EngineConfig {
    /// Load from a RON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Parse from RON text
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_passes_per_frame, 1);
        assert_eq!(config.log_filter, "pixelflow=info");
        assert_eq!(config.default_canvas, (256, 256));
        assert_eq!(config.warn_cache_bytes, None);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig {
            max_passes_per_frame: 3,
            noise_seed: 77,
            warn_cache_bytes: Some(1 << 20),
            ..Default::default()
        };
        let ron_str = config.to_ron_string().unwrap();
        let loaded = EngineConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = EngineConfig::from_ron_str("(noise_seed: 5)").unwrap();
        assert_eq!(config.noise_seed, 5);
        assert_eq!(config.max_passes_per_frame, 1);
    }

    #[test]
    fn test_bad_ron_is_an_error() {
        assert!(matches!(
            EngineConfig::from_ron_str("(max_passes_per_frame: \"many\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pixelflow-config-that-does-not-exist.ron");
        assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
    }
}
