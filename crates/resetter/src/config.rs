//! Resetter configuration management
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behaviour: match "STMicroelectronics", report reset failures, log
//! warnings only.

use crate::scanner::FailurePolicy;
use anyhow::{Context, Result, anyhow};
use common::LOG_LEVELS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Manufacturer string matched when nothing else is configured
pub const DEFAULT_MANUFACTURER: &str = "STMicroelectronics";

/// System-wide configuration file, checked after the per-user one
pub const SYSTEM_CONFIG_PATH: &str = "/etc/stm-usb-reset/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetterConfig {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which device to look for and how to react to a failed reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Exact, case-sensitive manufacturer string to match
    #[serde(default = "ScanSettings::default_manufacturer")]
    pub manufacturer: String,
    /// Name used in the status line ("STM found and reset")
    #[serde(default = "ScanSettings::default_label")]
    pub label: String,
    /// Report (exit 1) or propagate a failed reset
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            manufacturer: Self::default_manufacturer(),
            label: Self::default_label(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl ScanSettings {
    fn default_manufacturer() -> String {
        DEFAULT_MANUFACTURER.to_string()
    }

    fn default_label() -> String {
        "STM".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level, overridden by RUST_LOG
    #[serde(default = "LoggingSettings::default_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingSettings {
    fn default_level() -> String {
        "warn".to_string()
    }
}

impl ResetterConfig {
    /// Load configuration from the specified path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ResetterConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the first configuration file found in the standard locations
    ///
    /// Returns the defaults when no file exists. An existing file that
    /// cannot be read or parsed is an error.
    pub fn discover() -> Result<Self> {
        match Self::candidate_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Standard configuration locations, in lookup order
    pub fn candidate_paths() -> Vec<PathBuf> {
        vec![Self::default_path(), PathBuf::from(SYSTEM_CONFIG_PATH)]
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("stm-usb-reset").join("config.toml")
        } else {
            PathBuf::from(".config/stm-usb-reset/config.toml")
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.scan.manufacturer.is_empty() {
            return Err(anyhow!("Manufacturer string must not be empty"));
        }

        if self.scan.label.trim().is_empty() {
            return Err(anyhow!("Status label must not be empty"));
        }

        Ok(())
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
