//! Configuration management for mypv
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable overrides.

use crate::device::DeviceIdentity;
use crate::error::{MyPvError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod defaults;

pub use defaults::DEFAULT_BASE_URL;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "MYPV_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device credentials
    pub device: DeviceConfig,

    /// Upstream REST API settings
    pub api: ApiConfig,

    /// Per-category poll intervals
    pub polling: PollingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,
}

/// Serial and API key of the configured AC THOR
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device serial number
    pub serial: String,

    /// API key issued by the myPV portal
    pub api_key: String,
}

/// myPV cloud API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, endpoints are appended verbatim
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Poll intervals in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Device data (the API refreshes every 10s)
    pub data_seconds: u64,

    /// State of charge
    pub soc_seconds: u64,

    /// Solar forecast
    pub forecast_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console level override
    pub console_level: Option<String>,

    /// Optional file level override
    pub file_level: Option<String>,

    /// Path to log file (or directory)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Serve the sensor API
    pub enabled: bool,

    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first existing default location, then
    /// apply environment overrides
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let default_paths = [
            "mypv_config.yaml",
            "/data/mypv_config.yaml",
            "/etc/mypv/config.yaml",
        ];

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => default_paths
                .iter()
                .find(|path| Path::new(path).exists())
                .map(Self::from_file)
                .transpose()?
                .unwrap_or_default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override credentials from `MYPV_SERIAL` / `MYPV_API_KEY`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(serial) = lookup("MYPV_SERIAL").filter(|s| !s.trim().is_empty()) {
            self.device.serial = serial.trim().to_string();
        }
        if let Some(api_key) = lookup("MYPV_API_KEY").filter(|s| !s.trim().is_empty()) {
            self.device.api_key = api_key.trim().to_string();
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Device identity built from the configured credentials
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.device.serial.clone(), self.device.api_key.clone())
    }

    /// Copy of this configuration safe to show to users
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.device.api_key.is_empty() {
            copy.device.api_key = "***".to_string();
        }
        copy
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.device.serial.trim().is_empty() {
            return Err(MyPvError::validation(
                "device.serial",
                "Serial cannot be empty",
            ));
        }

        if self.device.api_key.trim().is_empty() {
            return Err(MyPvError::validation(
                "device.api_key",
                "API key cannot be empty",
            ));
        }

        match reqwest::Url::parse(&self.api.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => {
                return Err(MyPvError::validation(
                    "api.base_url",
                    "Must be an absolute http(s) URL",
                ));
            }
        }

        if self.api.timeout_seconds == 0 {
            return Err(MyPvError::validation(
                "api.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        for (field, value) in [
            ("polling.data_seconds", self.polling.data_seconds),
            ("polling.soc_seconds", self.polling.soc_seconds),
            ("polling.forecast_seconds", self.polling.forecast_seconds),
        ] {
            if value == 0 {
                return Err(MyPvError::validation(field, "Must be greater than 0"));
            }
        }

        if self.web.enabled && self.web.port == 0 {
            return Err(MyPvError::validation("web.port", "Port must be greater than 0"));
        }

        Ok(())
    }
}
