//! Configuration file support for drain.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/drain/config.toml`.
//! It is read once at startup; nothing here is changed by ledger operations.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub battery: BatteryConfig,

    #[serde(default)]
    pub data: DataConfig,
}

/// Battery the ledger is measured against
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatteryConfig {
    #[serde(default = "default_capacity_mah")]
    pub capacity_mah: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_mah: default_capacity_mah(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

impl DataConfig {
    /// Ledger file inside `data_dir`
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

// Default value functions
fn default_capacity_mah() -> f64 {
    14000.0
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drain")
}

fn default_file_name() -> String {
    "device_data.json".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("drain").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values the ledger cannot work with
    pub fn validate(&self) -> Result<()> {
        let capacity = self.battery.capacity_mah;
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(Error::Config(format!(
                "battery.capacity_mah must be a positive number, got {}",
                capacity
            )));
        }
        if self.data.file_name.trim().is_empty() {
            return Err(Error::Config("data.file_name must not be empty".into()));
        }
        Ok(())
    }
}
