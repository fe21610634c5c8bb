//! Producer endpoint - serves the record set over HTTP
//!
//! A single read path (configurable, default `/records`) returns the
//! current snapshot encoded with the tag codec as `text/plain`. Every
//! other path gets a literal `Not Found`. Path and tag name are
//! configuration, never hard-coded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use baton_protocol::tag;

use crate::error::EndpointError;
use crate::store::RecordStore;

/// Default listen port (matches the legacy deployment)
const DEFAULT_PORT: u16 = 8000;

/// Default read path
const DEFAULT_PATH: &str = "/records";

/// Default tag name
const DEFAULT_TAG: &str = "record";

/// Producer endpoint configuration
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Endpoint identifier for logging
    pub id: String,

    /// Bind address (e.g., "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,

    /// Read path (must start with '/')
    pub path: String,

    /// Tag name used to encode records
    pub tag: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            id: "producer".into(),
            address: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.into(),
            tag: DEFAULT_TAG.into(),
        }
    }
}

impl EndpointConfig {
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

/// Producer endpoint metrics
#[derive(Debug, Default)]
pub struct EndpointMetrics {
    /// Successful record reads served
    pub requests_served: AtomicU64,

    /// Records encoded across all reads
    pub records_served: AtomicU64,

    /// Requests that hit the 404 fallback
    pub not_found: AtomicU64,
}

impl EndpointMetrics {
    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> EndpointMetricsSnapshot {
        EndpointMetricsSnapshot {
            requests_served: self.requests_served.load(Ordering::Relaxed),
            records_served: self.records_served.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of endpoint metrics
#[derive(Debug, Clone, Copy)]
pub struct EndpointMetricsSnapshot {
    pub requests_served: u64,
    pub records_served: u64,
    pub not_found: u64,
}

/// Shared state for endpoint handlers
struct EndpointState {
    store: Arc<RecordStore>,
    tag: String,
    metrics: Arc<EndpointMetrics>,
}

/// Producer endpoint server
pub struct Endpoint {
    config: EndpointConfig,
    store: Arc<RecordStore>,
    metrics: Arc<EndpointMetrics>,
}

impl Endpoint {
    /// Create a new endpoint serving `store`
    pub fn new(config: EndpointConfig, store: Arc<RecordStore>) -> Self {
        Self {
            config,
            store,
            metrics: Arc::new(EndpointMetrics::default()),
        }
    }

    /// Get a handle to the endpoint metrics
    pub fn metrics(&self) -> Arc<EndpointMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the endpoint until cancelled
    pub async fn run(self, cancel: CancellationToken) -> Result<(), EndpointError> {
        if !self.config.path.starts_with('/') {
            return Err(EndpointError::InvalidPath(self.config.path.clone()));
        }

        let bind_addr = self.config.bind_address();

        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| EndpointError::Bind {
                address: bind_addr.clone(),
                source: e,
            })?;

        tracing::info!(
            endpoint_id = %self.config.id,
            address = %bind_addr,
            path = %self.config.path,
            tag = %self.config.tag,
            "producer endpoint listening"
        );

        let state = Arc::new(EndpointState {
            store: Arc::clone(&self.store),
            tag: self.config.tag.clone(),
            metrics: Arc::clone(&self.metrics),
        });

        let app = build_router(&self.config.path, state);

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            cancel.cancelled().await;
        });

        let result = server.await.map_err(|e| EndpointError::Http(e.to_string()));

        tracing::info!(endpoint_id = %self.config.id, "producer endpoint stopped");

        result
    }
}

/// Build the axum router
fn build_router(path: &str, state: Arc<EndpointState>) -> Router {
    Router::new()
        .route(path, get(serve_records))
        .fallback(not_found)
        .with_state(state)
}

/// GET <path> - serve the current record set, tag-encoded
async fn serve_records(State(state): State<Arc<EndpointState>>) -> Response {
    let snapshot = state.store.snapshot();
    let body = tag::encode(&snapshot, &state.tag);

    state.metrics.requests_served.fetch_add(1, Ordering::Relaxed);
    state
        .metrics
        .records_served
        .fetch_add(snapshot.len() as u64, Ordering::Relaxed);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        body,
    )
        .into_response()
}

/// Any other path - literal Not Found
async fn not_found(State(state): State<Arc<EndpointState>>) -> Response {
    state.metrics.not_found.fetch_add(1, Ordering::Relaxed);
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod endpoint_test;
