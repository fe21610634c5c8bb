//! Baton configuration
//!
//! TOML-based configuration loading with sensible defaults. A minimal
//! config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use baton_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[collector]\napi_token = \"key\"").unwrap();
//! assert_eq!(config.producer.port, 8000);
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [collector]
//! api_token = "api_key_for_b_456"
//!
//! [[sink.credentials]]
//! source = "B"
//! token = "api_key_for_b_456"
//! ```
//!
//! See `configs/example.toml` for all available options.

mod collector;
mod error;
mod logging;
mod producer;
mod sink;
mod trigger;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use collector::CollectorConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use producer::{NotifyConfig, ProducerConfig};
pub use sink::{CredentialEntry, SecurityMode, SinkConfig};
pub use trigger::TriggerConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Producer endpoint (record set publisher)
    pub producer: ProducerConfig,

    /// Trigger listener (collector's wake-up channel)
    pub trigger: TriggerConfig,

    /// Collector (pull-and-forward relay)
    pub collector: CollectorConfig,

    /// Ingestion sink (authenticated, persisted intake)
    pub sink: SinkConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
