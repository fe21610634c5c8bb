//! Sink configuration
//!
//! Credentials live here, injected into the sink at startup - the
//! membership check itself never changes, only the table feeding it.

use std::path::PathBuf;

use serde::Deserialize;

/// Transport security mode
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// No transport security (discouraged)
    #[default]
    Plain,
    /// Server-side TLS
    Tls,
    /// TLS with mandatory client-certificate verification
    Mutual,
}

/// A registered credential
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    /// Source identity the token maps to
    pub source: String,

    /// Shared secret presented as a bearer token
    pub token: String,
}

/// Sink configuration
///
/// # Example
///
/// ```toml
/// [sink]
/// port = 8443
/// db_path = "data/sink.db"
/// security = "mutual"
/// cert_path = "certs/server.crt"
/// key_path = "certs/server.key"
/// client_ca_path = "certs/ca.crt"
///
/// [[sink.credentials]]
/// source = "A"
/// token = "api_key_for_a_123"
///
/// [[sink.credentials]]
/// source = "B"
/// token = "api_key_for_b_456"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Whether the sink runs in this process
    /// Default: true
    pub enabled: bool,

    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 8443
    pub port: u16,

    /// SQLite database path (":memory:" for ephemeral storage)
    /// Default: "data/sink.db"
    pub db_path: String,

    /// Transport security mode (plain, tls, mutual)
    /// Default: plain
    pub security: SecurityMode,

    /// Server certificate chain (PEM), required for tls/mutual
    pub cert_path: Option<PathBuf>,

    /// Server private key (PEM), required for tls/mutual
    pub key_path: Option<PathBuf>,

    /// Trust anchor for client certificates (PEM), required for mutual
    pub client_ca_path: Option<PathBuf>,

    /// Registered credentials (token -> source identity)
    pub credentials: Vec<CredentialEntry>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "0.0.0.0".into(),
            port: 8443,
            db_path: "data/sink.db".into(),
            security: SecurityMode::Plain,
            cert_path: None,
            key_path: None,
            client_ca_path: None,
            credentials: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SinkConfig::default();
        assert!(config.enabled);
        assert_eq!(config.port, 8443);
        assert_eq!(config.security, SecurityMode::Plain);
        assert!(config.credentials.is_empty());
    }

    #[test]
    fn test_deserialize_security_modes() {
        for (s, expected) in [
            ("plain", SecurityMode::Plain),
            ("tls", SecurityMode::Tls),
            ("mutual", SecurityMode::Mutual),
        ] {
            let toml = format!("security = \"{}\"", s);
            let config: SinkConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.security, expected);
        }
    }

    #[test]
    fn test_unknown_security_mode_rejected() {
        let result: Result<SinkConfig, _> = toml::from_str("security = \"none\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_credentials() {
        let toml = r#"
[[credentials]]
source = "A"
token = "api_key_for_a_123"

[[credentials]]
source = "B"
token = "api_key_for_b_456"
"#;
        let config: SinkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.credentials.len(), 2);
        assert_eq!(config.credentials[0].source, "A");
        assert_eq!(config.credentials[1].token, "api_key_for_b_456");
    }

    #[test]
    fn test_deserialize_mutual_with_paths() {
        let toml = r#"
security = "mutual"
cert_path = "certs/server.crt"
key_path = "certs/server.key"
client_ca_path = "certs/ca.crt"
"#;
        let config: SinkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.security, SecurityMode::Mutual);
        assert!(config.client_ca_path.is_some());
    }
}
