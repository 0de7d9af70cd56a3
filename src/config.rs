/// Service configuration.
///
/// Settings come from a TOML file (`drfish.toml` by default, or the path in
/// `DRFISH_CONFIG`), then a handful of environment overrides, with `.env`
/// loaded first. Every field has a default, so a missing file is not an error.
///
/// ```toml
/// [pond]
/// name = "north-raceway"
/// fish_type = "Trout"
///
/// [monitor]
/// poll_interval_secs = 5
/// max_reading_age_minutes = 15
///
/// [endpoints]
/// readings_url = "https://simple-hf-api-server.onrender.com/random-int"
///
/// [logging]
/// level = "info"
/// file = "drfish.log"
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ingest::disease::DEFAULT_PREDICT_URL;
use crate::ingest::sensors::DEFAULT_READINGS_URL;
use crate::logging::LogLevel;
use crate::model::{DrFishError, FishType};

pub const DEFAULT_CONFIG_PATH: &str = "drfish.toml";

pub const ENV_CONFIG_PATH: &str = "DRFISH_CONFIG";
pub const ENV_FISH_TYPE: &str = "DRFISH_FISH_TYPE";
pub const ENV_READINGS_URL: &str = "DRFISH_READINGS_URL";
pub const ENV_LOG_FILE: &str = "DRFISH_LOG_FILE";

// ---------------------------------------------------------------------------
// Config file structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pond: PondConfig,
    pub monitor: MonitorConfig,
    pub endpoints: EndpointConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PondConfig {
    /// Label used in log lines.
    pub name: String,
    /// "Trout" or "Carp", case-insensitive.
    pub fish_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_secs: u64,
    pub max_reading_age_minutes: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub readings_url: String,
    pub predict_url: String,
    /// One Call-compatible weather URL. Weather advisories are skipped when unset.
    pub weather_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for PondConfig {
    fn default() -> Self {
        PondConfig {
            name: "pond".to_string(),
            fish_type: "Trout".to_string(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval_secs: 5,
            max_reading_age_minutes: 15,
            request_timeout_secs: 30,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            readings_url: DEFAULT_READINGS_URL.to_string(),
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            weather_url: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Config {
    pub fn fish_type(&self) -> Result<FishType, DrFishError> {
        self.pond.fish_type.parse()
    }

    pub fn log_level(&self) -> Result<LogLevel, DrFishError> {
        self.logging.level.parse().map_err(DrFishError::Config)
    }

    /// Checks values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<(), DrFishError> {
        self.fish_type()
            .map_err(|e| DrFishError::Config(format!("pond.fish_type: {}", e)))?;
        self.log_level()?;
        if self.monitor.poll_interval_secs == 0 {
            return Err(DrFishError::Config(
                "monitor.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.monitor.request_timeout_secs == 0 {
            return Err(DrFishError::Config(
                "monitor.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.endpoints.readings_url.trim().is_empty() {
            return Err(DrFishError::Config("endpoints.readings_url is empty".to_string()));
        }
        Ok(())
    }

    /// Applies environment overrides through `lookup`, so tests can pass a
    /// map instead of touching the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fish) = lookup(ENV_FISH_TYPE) {
            self.pond.fish_type = fish;
        }
        if let Some(url) = lookup(ENV_READINGS_URL) {
            self.endpoints.readings_url = url;
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            self.logging.file = Some(file);
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates config text.
pub fn parse_config(text: &str) -> Result<Config, DrFishError> {
    let config: Config = toml::from_str(text).map_err(|e| DrFishError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Loads a config file. A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> Result<Config, DrFishError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(DrFishError::Config(format!("cannot read {}: {}", path.display(), e))),
    }
}

/// Full startup sequence: `.env`, config file, environment overrides, validation.
pub fn load() -> Result<Config, DrFishError> {
    dotenv::dotenv().ok();

    let path = std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_config_file(&path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
