//! Service configuration.
//!
//! Read once at startup from a TOML file (`aqmon.toml` by default, or the
//! path in `AQMON_CONFIG`). Every section is optional; missing keys take the
//! defaults below. `.env` is loaded first so secrets can stay out of the
//! file:
//!
//! ```toml
//! [openaq]
//! base_url = "https://api.openaq.org"
//! radius_m = 25000
//! limit = 100
//! timeout_secs = 30
//!
//! [pipeline]
//! max_age_minutes = 180
//!
//! [logging]
//! level = "info"
//! file = "aqmon.log"
//! timestamps = true
//!
//! [breakpoints]
//! pm25 = [9.0, 35.4, 55.4, 125.4]
//! ```

use crate::logging::LogLevel;
use crate::species::BreakpointTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "aqmon.toml";
pub const CONFIG_PATH_ENV: &str = "AQMON_CONFIG";
pub const API_KEY_ENV: &str = "OPENAQ_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAQ_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error for config file '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML from '{0}': {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAqSettings {
    pub base_url: String,
    /// Search radius around the requested point, in metres.
    pub radius_m: u32,
    /// Maximum number of monitoring locations per request.
    pub limit: u32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for OpenAqSettings {
    fn default() -> Self {
        Self {
            base_url: crate::ingest::openaq::OPENAQ_BASE_URL.to_string(),
            radius_m: crate::ingest::openaq::DEFAULT_RADIUS_M,
            limit: crate::ingest::openaq::DEFAULT_LIMIT,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Drop measurements older than this. Unset keeps everything.
    pub max_age_minutes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openaq: OpenAqSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
    /// Per-species breakpoint overrides, `species = [b0, b1, b2, b3]`.
    pub breakpoints: BTreeMap<String, [f64; 4]>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`. A missing file yields the defaults; any other read
    /// failure is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(path.to_path_buf(), e)),
        }
    }

    /// Loads `.env`, then the config file (explicit path, else
    /// `AQMON_CONFIG`, else `aqmon.toml`), then applies environment
    /// overrides.
    pub fn load_from_env(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => env::var(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
        };

        let mut config = Self::load(&path)?;
        config.apply_overrides(env::var(API_KEY_ENV).ok(), env::var(BASE_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, api_key: Option<String>, base_url: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.openaq.api_key = Some(key);
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.openaq.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openaq.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("openaq.base_url must not be empty".into()));
        }
        if self.openaq.radius_m == 0 {
            return Err(ConfigError::Invalid("openaq.radius_m must be positive".into()));
        }
        if self.openaq.limit == 0 {
            return Err(ConfigError::Invalid("openaq.limit must be positive".into()));
        }
        if self.openaq.timeout_secs == 0 {
            return Err(ConfigError::Invalid("openaq.timeout_secs must be positive".into()));
        }
        self.breakpoint_table().map(|_| ())
    }

    /// Builds the breakpoint table: built-in tables plus `[breakpoints]`.
    pub fn breakpoint_table(&self) -> Result<BreakpointTable, ConfigError> {
        BreakpointTable::with_overrides(&self.breakpoints)
            .map_err(|e| ConfigError::Invalid(format!("breakpoints.{}", e)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
