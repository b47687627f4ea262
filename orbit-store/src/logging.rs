use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the Orbit store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    /// Path to the log file
    pub log_file: PathBuf,
    /// Whether to clear the log file on startup
    pub clear_on_startup: bool,
    /// Feature flags for specific logging categories
    pub features: LogFeatures,
    /// Overall log level
    #[serde(with = "level_format")]
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFeatures {
    /// Log store actions (posts, comments, messages, notifications)
    pub actions: bool,
    /// Log auto-reply scheduling and delivery
    pub replies: bool,
    /// Log preference storage reads and writes
    pub storage: bool,
}

mod level_format {
    use log::LevelFilter;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(level.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<LevelFilter>().map_err(serde::de::Error::custom)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("orbit_store.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            actions: true,
            replies: true,
            storage: true,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with all features disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a minimal log configuration (only errors and warnings)
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Warn,
            features: LogFeatures {
                actions: false,
                replies: false,
                storage: false,
            },
            ..Default::default()
        }
    }

    /// Create a verbose log configuration (all features enabled)
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Trace,
            features: LogFeatures::default(),
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!(
        "Logging initialized: file={}, level={:?}",
        config.log_file.display(),
        config.level
    );
    log::debug!("Log features: {:?}", config.features);

    Ok(())
}

/// Macro for logging store actions
#[macro_export]
macro_rules! log_action {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.actions {
            log::debug!(target: "actions", $($arg)*);
        }
    };
}

/// Macro for logging auto-reply scheduling and delivery
#[macro_export]
macro_rules! log_reply {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.replies {
            log::debug!(target: "replies", $($arg)*);
        }
    };
}

/// Macro for logging preference storage
#[macro_export]
macro_rules! log_storage {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.storage {
            log::debug!(target: "storage", $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_disables_every_feature() {
        let config = LogConfig::minimal();
        assert_eq!(config.level, LevelFilter::Warn);
        assert!(!config.features.actions);
        assert!(!config.features.replies);
        assert!(!config.features.storage);
    }

    #[test]
    fn test_level_round_trips_through_json() {
        let config = LogConfig::verbose();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"TRACE\""));
        let parsed: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: LogConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!parsed.enabled);
        assert_eq!(parsed.level, LevelFilter::Info);
        assert_eq!(parsed.features, LogFeatures::default());
    }
}
