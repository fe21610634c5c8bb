//! Producer configuration
//!
//! The producer serves its record set at a configurable path with a
//! configurable tag name - the legacy deployments disagreed on both,
//! so neither is hard-coded.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Producer configuration
///
/// # Example
///
/// ```toml
/// [producer]
/// port = 8000
/// path = "/itemlines"
/// tag = "custom"
/// records_file = "records.txt"
///
/// [producer.notify]
/// address = "127.0.0.1"
/// port = 5051
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Whether the producer runs in this process
    /// Default: true
    pub enabled: bool,

    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 8000
    pub port: u16,

    /// Read path served by the endpoint (must start with '/')
    /// Default: "/records"
    pub path: String,

    /// Tag name used to encode records
    /// Default: "record"
    pub tag: String,

    /// File with one record per line; when absent, a built-in demo set
    /// is published
    pub records_file: Option<PathBuf>,

    /// Re-read the records file, republish, and re-notify on this
    /// interval (omit for publish-once)
    #[serde(default, with = "humantime_serde::option")]
    pub refresh_interval: Option<Duration>,

    /// Trigger target notified after each publish (omit to disable)
    pub notify: Option<NotifyConfig>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "0.0.0.0".into(),
            port: 8000,
            path: "/records".into(),
            tag: "record".into(),
            records_file: None,
            refresh_interval: None,
            notify: None,
        }
    }
}

/// Trigger target the producer notifies after publishing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Collector's trigger listener address
    /// Default: "127.0.0.1"
    pub address: String,

    /// Collector's trigger listener port
    /// Default: 5051
    pub port: u16,

    /// Trigger token to send
    /// Default: "SUCCESS"
    pub token: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".into(),
            port: 5051,
            token: "SUCCESS".into(),
        }
    }
}

impl NotifyConfig {
    /// Get the socket address to connect to
    pub fn target_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProducerConfig::default();
        assert!(config.enabled);
        assert_eq!(config.port, 8000);
        assert_eq!(config.path, "/records");
        assert_eq!(config.tag, "record");
        assert!(config.notify.is_none());
        assert!(config.refresh_interval.is_none());
    }

    #[test]
    fn test_deserialize_legacy_pairing() {
        let toml = r#"
port = 8000
path = "/itemlines"
tag = "custom"
"#;
        let config: ProducerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.path, "/itemlines");
        assert_eq!(config.tag, "custom");
    }

    #[test]
    fn test_deserialize_notify_and_refresh() {
        let toml = r#"
refresh_interval = "10s"

[notify]
address = "10.0.0.5"
port = 5051
token = "SUCCESS"
"#;
        let config: ProducerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(10)));

        let notify = config.notify.unwrap();
        assert_eq!(notify.target_address(), "10.0.0.5:5051");
        assert_eq!(notify.token, "SUCCESS");
    }
}
