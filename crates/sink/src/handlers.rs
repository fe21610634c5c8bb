//! Sink route handlers
//!
//! - `POST /log` - authenticated submission, persisted before the ack
//! - `GET /health` - liveness probe, no side effects

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::auth::CredentialStore;
use crate::metrics::SinkMetrics;
use crate::store::{LogStore, NewLogEntry};

/// Shared state for handlers
pub struct HandlerState {
    pub credentials: CredentialStore,
    pub store: LogStore,
    pub metrics: Arc<SinkMetrics>,
}

/// Successful submission response
#[derive(Debug, Serialize)]
struct SubmitAccepted {
    status: &'static str,
    received_from: String,
    bytes: usize,
}

/// Health probe response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    time_utc: String,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

/// Create an error response
fn error_response(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error,
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

/// POST /log - persist one raw submission
///
/// The payload is stored verbatim - no parsing, no content validation.
/// The 200 response is only sent after the entry is durably written.
pub async fn submit(
    State(state): State<Arc<HandlerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.metrics.requests_received.fetch_add(1, Ordering::Relaxed);

    let source = match state.credentials.authenticate(&headers) {
        Ok(source) => source,
        Err(e) => {
            state.metrics.auth_failures.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(client = %addr, error = %e, "submission rejected");
            return error_response(e.status(), "auth_failed", e.to_string());
        }
    };

    let bytes = body.len();
    let entry = NewLogEntry {
        source: source.clone(),
        client_addr: addr.to_string(),
        headers: serialize_headers(&headers),
        payload: body.to_vec(),
    };

    match state.store.append(entry).await {
        Ok(receipt) => {
            state.metrics.entries_persisted.fetch_add(1, Ordering::Relaxed);
            state
                .metrics
                .bytes_persisted
                .fetch_add(bytes as u64, Ordering::Relaxed);

            tracing::debug!(
                seq = receipt.sequence_id,
                source = %source,
                client = %addr,
                bytes,
                "submission persisted"
            );

            (
                StatusCode::OK,
                Json(SubmitAccepted {
                    status: "ok",
                    received_from: source.to_string(),
                    bytes,
                }),
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.storage_errors.fetch_add(1, Ordering::Relaxed);
            tracing::error!(source = %source, error = %e, "failed to persist submission");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "submission was not persisted",
            )
        }
    }
}

/// GET /health - liveness probe
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            time_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }),
    )
}

/// Serialize request headers as a JSON object
///
/// Non-UTF-8 header values are replaced lossily; repeated headers keep
/// the last value.
fn serialize_headers(headers: &HeaderMap) -> String {
    let map: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                serde_json::Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    serde_json::Value::Object(map).to_string()
}
