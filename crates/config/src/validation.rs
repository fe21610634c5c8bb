//! Configuration validation
//!
//! Catches at load time what would otherwise fail at startup or,
//! worse, run insecurely: a security mode without its certificate
//! material, an enabled collector with no token, duplicate credential
//! tokens that would silently shadow each other.

use std::collections::HashSet;

use crate::error::{ConfigError, Result};
use crate::sink::SecurityMode;
use crate::Config;

/// Validate the full configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.producer.enabled && !config.producer.path.starts_with('/') {
        return Err(ConfigError::invalid_value(
            "producer",
            "path",
            "must start with '/'",
        ));
    }

    if config.producer.enabled && config.producer.tag.is_empty() {
        return Err(ConfigError::missing_field("producer", "tag"));
    }

    if config.trigger.token.is_empty() {
        return Err(ConfigError::missing_field("trigger", "token"));
    }

    if config.collector.enabled {
        if config.collector.producer_url.is_empty() {
            return Err(ConfigError::missing_field("collector", "producer_url"));
        }
        if config.collector.sink_url.is_empty() {
            return Err(ConfigError::missing_field("collector", "sink_url"));
        }
        if config.collector.api_token.is_empty() {
            return Err(ConfigError::missing_field("collector", "api_token"));
        }
        if config.collector.tag.is_empty() {
            return Err(ConfigError::missing_field("collector", "tag"));
        }
    }

    if config.sink.enabled {
        validate_sink(config)?;
    }

    Ok(())
}

fn validate_sink(config: &Config) -> Result<()> {
    let sink = &config.sink;

    // The sink refuses to start without its certificate material; the
    // files themselves are checked when the listener comes up.
    if sink.security != SecurityMode::Plain {
        if sink.cert_path.is_none() {
            return Err(ConfigError::missing_field("sink", "cert_path"));
        }
        if sink.key_path.is_none() {
            return Err(ConfigError::missing_field("sink", "key_path"));
        }
    }

    if sink.security == SecurityMode::Mutual && sink.client_ca_path.is_none() {
        return Err(ConfigError::missing_field("sink", "client_ca_path"));
    }

    let mut seen = HashSet::new();
    for entry in &sink.credentials {
        if entry.token.is_empty() {
            return Err(ConfigError::invalid_value(
                "sink",
                "credentials",
                format!("empty token for source '{}'", entry.source),
            ));
        }
        if !seen.insert(entry.token.as_str()) {
            return Err(ConfigError::invalid_value(
                "sink",
                "credentials",
                format!("duplicate token (second use by source '{}')", entry.source),
            ));
        }
    }

    Ok(())
}
