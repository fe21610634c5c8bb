//! Transport security configuration
//!
//! Three modes, mirroring how the sink is deployed:
//!
//! - `plain` - no transport security. Allowed but discouraged; the
//!   sink logs a warning at startup.
//! - `tls` - server certificate + key.
//! - `mutual` - TLS plus mandatory client-certificate verification
//!   against a configured trust anchor.
//!
//! Credential authentication is independent of and additional to any
//! transport-level client identity. Missing or unreadable certificate
//! material is a startup error - the sink refuses to run rather than
//! fall back to an insecure mode.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::RootCertStore;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;

use crate::error::SinkError;

/// Transport security mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecurityMode {
    /// No transport security (discouraged)
    #[default]
    Plain,
    /// Server-side TLS
    Tls,
    /// TLS with mandatory client-certificate verification
    Mutual,
}

impl SecurityMode {
    /// Mode name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Tls => "tls",
            Self::Mutual => "mutual",
        }
    }
}

/// TLS settings for the sink listener
#[derive(Debug, Clone, Default)]
pub struct TlsSettings {
    /// Transport security mode
    pub mode: SecurityMode,

    /// Server certificate chain (PEM), required for tls/mutual
    pub cert_path: Option<PathBuf>,

    /// Server private key (PEM), required for tls/mutual
    pub key_path: Option<PathBuf>,

    /// Trust anchor for client certificates (PEM), required for mutual
    pub client_ca_path: Option<PathBuf>,
}

impl TlsSettings {
    /// Build the rustls server configuration for tls/mutual modes
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Tls` when required material is missing,
    /// unreadable, or malformed. Callers treat this as fatal.
    pub fn build_server_config(&self) -> Result<rustls::ServerConfig, SinkError> {
        let cert_path = self
            .cert_path
            .as_deref()
            .ok_or_else(|| missing("cert_path", self.mode))?;
        let key_path = self
            .key_path
            .as_deref()
            .ok_or_else(|| missing("key_path", self.mode))?;

        let certs = load_certs(cert_path)?;
        let key = load_key(key_path)?;

        let builder = rustls::ServerConfig::builder();

        let builder = match self.mode {
            SecurityMode::Mutual => {
                let ca_path = self
                    .client_ca_path
                    .as_deref()
                    .ok_or_else(|| missing("client_ca_path", self.mode))?;

                let mut roots = RootCertStore::empty();
                for cert in load_certs(ca_path)? {
                    roots.add(cert).map_err(|e| {
                        SinkError::Tls(format!(
                            "invalid trust anchor in {}: {}",
                            ca_path.display(),
                            e
                        ))
                    })?;
                }

                let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
                    .build()
                    .map_err(|e| {
                        SinkError::Tls(format!("failed to build client verifier: {}", e))
                    })?;

                builder.with_client_cert_verifier(verifier)
            }
            _ => builder.with_no_client_auth(),
        };

        builder
            .with_single_cert(certs, key)
            .map_err(|e| SinkError::Tls(format!("invalid certificate/key pair: {}", e)))
    }
}

fn missing(field: &str, mode: SecurityMode) -> SinkError {
    SinkError::Tls(format!(
        "security mode '{}' requires {}",
        mode.as_str(),
        field
    ))
}

/// Load a PEM certificate chain
fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, SinkError> {
    let file = File::open(path)
        .map_err(|e| SinkError::Tls(format!("failed to read {}: {}", path.display(), e)))?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<_, _>>()
        .map_err(|e| SinkError::Tls(format!("invalid PEM in {}: {}", path.display(), e)))?;

    if certs.is_empty() {
        return Err(SinkError::Tls(format!(
            "no certificates found in {}",
            path.display()
        )));
    }

    Ok(certs)
}

/// Load a PEM private key
fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, SinkError> {
    let file = File::open(path)
        .map_err(|e| SinkError::Tls(format!("failed to read {}: {}", path.display(), e)))?;

    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|e| SinkError::Tls(format!("invalid PEM in {}: {}", path.display(), e)))?
        .ok_or_else(|| SinkError::Tls(format!("no private key found in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_mode_requires_cert_and_key() {
        let settings = TlsSettings {
            mode: SecurityMode::Tls,
            ..Default::default()
        };

        let err = settings.build_server_config().unwrap_err();
        assert!(err.to_string().contains("cert_path"));
    }

    #[test]
    fn test_mutual_mode_requires_trust_anchor() {
        let dir = tempfile::tempdir().unwrap();
        // Present but empty files get past the path checks.
        let cert = dir.path().join("server.crt");
        let key = dir.path().join("server.key");
        std::fs::write(&cert, "").unwrap();
        std::fs::write(&key, "").unwrap();

        let settings = TlsSettings {
            mode: SecurityMode::Mutual,
            cert_path: Some(cert),
            key_path: Some(key),
            client_ca_path: None,
        };

        let err = settings.build_server_config().unwrap_err();
        // Empty cert file fails before the CA check; either way it must
        // refuse to start.
        assert!(matches!(err, SinkError::Tls(_)));
    }

    #[test]
    fn test_unreadable_material_refuses_to_start() {
        let settings = TlsSettings {
            mode: SecurityMode::Tls,
            cert_path: Some("/nonexistent/server.crt".into()),
            key_path: Some("/nonexistent/server.key".into()),
            client_ca_path: None,
        };

        let err = settings.build_server_config().unwrap_err();
        assert!(matches!(err, SinkError::Tls(_)));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(SecurityMode::Plain.as_str(), "plain");
        assert_eq!(SecurityMode::Tls.as_str(), "tls");
        assert_eq!(SecurityMode::Mutual.as_str(), "mutual");
    }
}
