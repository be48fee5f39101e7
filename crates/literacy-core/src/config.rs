//! TOML-based widget configuration.
//!
//! Stores:
//! - Flash threshold (seconds into the attempt when the flash checkpoint fires)
//! - Tick interval for the async clock driver
//!
//! The default location is `~/.config/literacy-widget/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FLASH_TIME: u64 = 60;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteracyConfig {
    /// Flash threshold in seconds.
    #[serde(default = "default_flash_time")]
    pub flash_time: u64,
    /// Period of one clock tick in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_flash_time() -> u64 {
    DEFAULT_FLASH_TIME
}
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for LiteracyConfig {
    fn default() -> Self {
        Self {
            flash_time: default_flash_time(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl LiteracyConfig {
    /// Build from the host's `data-flash` attribute. Missing or non-numeric
    /// values fall back to the default threshold.
    pub fn from_flash_attr(attr: Option<&str>) -> Self {
        let flash_time = attr
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or_else(|| {
                if let Some(raw) = attr {
                    tracing::debug!(raw, "unusable flash attribute, using default");
                }
                DEFAULT_FLASH_TIME
            });
        Self {
            flash_time,
            ..Self::default()
        }
    }

    /// Tick period, never shorter than 1 ms.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero threshold or interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flash_time == 0 {
            return Err(ConfigError::InvalidValue {
                key: "flash_time".into(),
                message: "must be a positive number of seconds".into(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_ms".into(),
                message: "must be a positive number of milliseconds".into(),
            });
        }
        Ok(())
    }

    /// Returns `~/.config/literacy-widget[-dev]/config.toml` based on LITERACY_ENV.
    pub fn default_path() -> PathBuf {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("LITERACY_ENV").unwrap_or_else(|_| "production".to_string());
        let dir = if env == "dev" {
            base_dir.join("literacy-widget-dev")
        } else {
            base_dir.join("literacy-widget")
        };
        dir.join("config.toml")
    }

    /// Load from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: LiteracyConfig = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path`, returning default on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "using default config");
            Self::default()
        })
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = LiteracyConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: LiteracyConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.flash_time, 60);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let parsed: LiteracyConfig = toml::from_str("flash_time = 45").unwrap();
        assert_eq!(parsed.flash_time, 45);
        assert_eq!(parsed.tick_interval_ms, 1000);
    }

    #[test]
    fn flash_attr_falls_back_to_default() {
        assert_eq!(LiteracyConfig::from_flash_attr(None).flash_time, 60);
        assert_eq!(LiteracyConfig::from_flash_attr(Some("abc")).flash_time, 60);
        assert_eq!(LiteracyConfig::from_flash_attr(Some("")).flash_time, 60);
        assert_eq!(LiteracyConfig::from_flash_attr(Some("0")).flash_time, 60);
        assert_eq!(LiteracyConfig::from_flash_attr(Some(" 30 ")).flash_time, 30);
    }

    #[test]
    fn validate_rejects_zero() {
        let cfg = LiteracyConfig {
            flash_time: 0,
            ..LiteracyConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "flash_time"
        ));
    }

    #[test]
    fn tick_interval_is_clamped() {
        let config = LiteracyConfig {
            tick_interval_ms: 0,
            ..LiteracyConfig::default()
        };
        assert_eq!(config.tick_interval(), std::time::Duration::from_millis(1));
        assert_eq!(LiteracyConfig::default().tick_interval(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = LiteracyConfig {
            flash_time: 3,
            tick_interval_ms: 250,
        };
        cfg.save(&path).unwrap();
        assert_eq!(LiteracyConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LiteracyConfig::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(cfg, LiteracyConfig::default());
    }
}
