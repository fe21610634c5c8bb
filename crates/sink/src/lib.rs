//! Ingestion Sink - authenticated, persisted raw-payload intake
//!
//! The sink is the terminal component of the relay: it authenticates
//! callers against a static credential map, appends every accepted
//! payload verbatim to an SQLite log, and answers a liveness probe.
//!
//! # Endpoints
//!
//! - `POST /log` - submit a raw payload.
//!   `Authorization: Bearer <token>` required; missing or malformed
//!   header is `401`, unknown token is `403`. On success the entry is
//!   durably written before the `200` ack:
//!   `{"status":"ok","received_from":"<source>","bytes":<n>}`.
//! - `GET /health` - `200 {"status":"ok","time_utc":"<ISO8601>"}`.
//!
//! # Transport security
//!
//! `plain` (discouraged, warns at startup), `tls`, or `mutual`
//! (client certificates verified against a trust anchor). Credential
//! auth applies in every mode. Missing certificate material refuses
//! startup instead of degrading.
//!
//! # Example
//!
//! ```ignore
//! use baton_sink::{CredentialStore, Sink, SinkConfig};
//!
//! let mut credentials = CredentialStore::new();
//! credentials.insert("A", "api_key_for_a");
//!
//! let sink = Sink::new(SinkConfig::default(), credentials);
//! sink.run(cancel).await?;
//! ```

mod auth;
mod error;
mod handlers;
mod metrics;
mod store;
mod tls;


use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use auth::{AuthError, CredentialStore};
pub use error::SinkError;
pub use metrics::{SinkMetrics, SinkMetricsSnapshot};
pub use store::{AppendReceipt, LogStore, NewLogEntry};
pub use tls::{SecurityMode, TlsSettings};

use handlers::{HandlerState, health, submit};

/// Default listen port (matches the legacy deployment)
const DEFAULT_PORT: u16 = 8443;

/// Default database path
const DEFAULT_DB_PATH: &str = "data/sink.db";

/// Grace period for in-flight requests on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Ingestion sink configuration
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Sink identifier for logging
    pub id: String,

    /// Bind address (e.g., "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,

    /// SQLite database path (":memory:" for ephemeral storage)
    pub db_path: String,

    /// Transport security settings
    pub security: TlsSettings,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            id: "sink".into(),
            address: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.into(),
            security: TlsSettings::default(),
        }
    }
}

impl SinkConfig {
    /// Create config with custom port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Ingestion sink server
pub struct Sink {
    config: SinkConfig,
    credentials: CredentialStore,
    metrics: Arc<SinkMetrics>,
}

impl Sink {
    /// Create a new sink
    pub fn new(config: SinkConfig, credentials: CredentialStore) -> Self {
        Self {
            config,
            credentials,
            metrics: Arc::new(SinkMetrics::default()),
        }
    }

    /// Get a handle to the sink metrics
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the sink until cancelled
    ///
    /// Opens the store, binds the listener in the configured security
    /// mode, and serves until cancellation. Missing TLS material or an
    /// unusable store is a startup error.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), SinkError> {
        if self.credentials.is_empty() {
            tracing::warn!(
                sink_id = %self.config.id,
                "no credentials configured, every submission will be rejected"
            );
        }

        let store = open_store(&self.config.db_path).await?;

        let state = Arc::new(HandlerState {
            credentials: self.credentials,
            store,
            metrics: Arc::clone(&self.metrics),
        });

        let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();
        let bind_addr = self.config.bind_address();

        match self.config.security.mode {
            SecurityMode::Plain => {
                tracing::warn!(
                    sink_id = %self.config.id,
                    "running without transport security, not recommended outside development"
                );

                let listener =
                    TcpListener::bind(&bind_addr)
                        .await
                        .map_err(|e| SinkError::Bind {
                            address: bind_addr.clone(),
                            source: e,
                        })?;

                tracing::info!(
                    sink_id = %self.config.id,
                    address = %bind_addr,
                    security = "plain",
                    "sink listening"
                );

                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    cancel.cancelled().await;
                });

                server.await.map_err(|e| SinkError::Http(e.to_string()))?;
            }
            mode @ (SecurityMode::Tls | SecurityMode::Mutual) => {
                // The provider may already be installed by another component.
                let _ = rustls::crypto::ring::default_provider().install_default();

                let server_config = self.config.security.build_server_config()?;
                let rustls_config = RustlsConfig::from_config(Arc::new(server_config));

                let addr: SocketAddr = bind_addr
                    .parse()
                    .map_err(|_| SinkError::InvalidAddress(bind_addr.clone()))?;

                tracing::info!(
                    sink_id = %self.config.id,
                    address = %bind_addr,
                    security = mode.as_str(),
                    "sink listening"
                );

                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    cancel.cancelled().await;
                    shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                });

                axum_server::bind_rustls(addr, rustls_config)
                    .handle(handle)
                    .serve(app)
                    .await
                    .map_err(|e| SinkError::Http(e.to_string()))?;
            }
        }

        tracing::info!(sink_id = %self.config.id, "sink stopped");
        Ok(())
    }
}

/// Open the log store, creating parent directories for file-backed paths
async fn open_store(db_path: &str) -> Result<LogStore, SinkError> {
    if db_path == ":memory:" {
        return LogStore::memory().await;
    }

    if let Some(parent) = Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    LogStore::open(db_path).await
}

/// Build the axum router
fn build_router(state: Arc<HandlerState>) -> Router {
    Router::new()
        .route("/log", post(submit))
        .route("/health", get(health))
        .with_state(state)
}
