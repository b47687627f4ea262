use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogConfig;

/// Environment variable that overrides the `~/.orbit` configuration directory
pub const CONFIG_DIR_ENV: &str = "ORBIT_CONFIG_DIR";

/// Tunables for the store, stored as `config.json` in the config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Lower bound of the auto-reply delay, inclusive
    pub reply_delay_min_ms: u64,
    /// Upper bound of the auto-reply delay, exclusive
    pub reply_delay_max_ms: u64,
    /// Category assigned to posts created through the store
    pub default_post_category: String,
    pub max_post_images: usize,
    /// Preference key the theme is persisted under
    pub theme_key: String,
    /// Fixed seed for reply selection and delays; random when unset
    pub rng_seed: Option<u64>,
    pub logging: LogConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reply_delay_min_ms: 1500,
            reply_delay_max_ms: 2500,
            default_post_category: "Technology".to_string(),
            max_post_images: 4,
            theme_key: "orbit-theme".to_string(),
            rng_seed: None,
            logging: LogConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn reply_delay_bounds(&self) -> (Duration, Duration) {
        let min = Duration::from_millis(self.reply_delay_min_ms);
        let max = Duration::from_millis(self.reply_delay_max_ms.max(self.reply_delay_min_ms));
        (min, max)
    }
}

/// Configuration manager for the .orbit directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at `$ORBIT_CONFIG_DIR` or `~/.orbit`
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Self::with_dir(config_dir)
    }

    /// Create a config manager rooted at an explicit directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .orbit directory")?;
        }

        Ok(Self { config_dir })
    }

    fn get_config_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home_dir.join(".orbit"))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn get_config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Path of the JSON file backing persisted preferences
    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }

    /// Load the store configuration, falling back to defaults when absent
    pub fn load_config(&self) -> Result<StoreConfig> {
        let config_file = self.get_config_file();

        if !config_file.exists() {
            log::debug!("No config at {}, using defaults", config_file.display());
            return Ok(StoreConfig::default());
        }

        let json = fs::read_to_string(&config_file).context("Failed to read config file")?;
        let config: StoreConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;

        Ok(config)
    }

    pub fn save_config(&self, config: &StoreConfig) -> Result<()> {
        let config_file = self.get_config_file();
        let json =
            serde_json::to_string_pretty(config).context("Failed to serialize store config")?;

        fs::write(&config_file, json).context("Failed to write config file")?;

        Ok(())
    }
}
