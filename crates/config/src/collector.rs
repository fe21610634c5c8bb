//! Collector configuration

use std::time::Duration;

use serde::Deserialize;

/// Collector configuration
///
/// # Example
///
/// ```toml
/// [collector]
/// id = "collector-b"
/// producer_url = "http://127.0.0.1:8000/records"
/// tag = "record"
/// sink_url = "https://127.0.0.1:8443"
/// api_token = "api_key_for_b_456"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Whether the collector runs in this process
    /// Default: true
    pub enabled: bool,

    /// Collector identity - becomes the envelope's source id
    /// Default: "collector"
    pub id: String,

    /// Producer endpoint URL to pull from
    /// Default: "http://127.0.0.1:8000/records"
    pub producer_url: String,

    /// Tag name agreed with the producer
    /// Default: "record"
    pub tag: String,

    /// Sink base URL to submit to
    /// Default: "http://127.0.0.1:8443"
    pub sink_url: String,

    /// Bearer token registered at the sink
    pub api_token: String,

    /// Timeout for each pull and submit request
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            id: "collector".into(),
            producer_url: "http://127.0.0.1:8000/records".into(),
            tag: "record".into(),
            sink_url: "http://127.0.0.1:8443".into(),
            api_token: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.id, "collector");
        assert_eq!(config.tag, "record");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_deserialize_with_timeout() {
        let toml = r#"
id = "collector-b"
api_token = "api_key_for_b_456"
request_timeout = "5s"
"#;
        let config: CollectorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.id, "collector-b");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
