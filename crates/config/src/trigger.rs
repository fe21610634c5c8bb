//! Trigger listener configuration

use serde::Deserialize;

/// Trigger listener configuration (collector side)
///
/// # Example
///
/// ```toml
/// [trigger]
/// port = 5051
/// token = "SUCCESS"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 5051
    pub port: u16,

    /// Token that wakes the collector (case-sensitive)
    /// Default: "SUCCESS"
    pub token: String,

    /// Wake queue depth; signals beyond this are dropped
    /// Default: 1
    pub queue_depth: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 5051,
            token: "SUCCESS".into(),
            queue_depth: 1,
        }
    }
}
