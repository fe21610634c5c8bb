//! Trigger listener
//!
//! Accepts raw TCP connections, reads the payload, and forwards exact
//! token matches into a bounded wake channel. Each connection is
//! handled in its own task so a slow or stalled peer never blocks the
//! accept loop.
//!
//! The wake channel is intentionally shallow (depth 1 by default): one
//! trigger may queue behind an in-flight pull, and anything beyond
//! that is dropped and counted. The pull side stays strictly
//! sequential without the listener ever blocking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::TriggerError;

/// Default listen port (matches the legacy deployment)
const DEFAULT_PORT: u16 = 5051;

/// Default trigger token
const DEFAULT_TOKEN: &str = "SUCCESS";

/// Default maximum payload read per connection
const DEFAULT_MAX_FRAME: usize = 1024;

/// Default wake queue depth
const DEFAULT_QUEUE_DEPTH: usize = 1;

/// Receiver half of the wake channel
pub type WakeReceiver = mpsc::Receiver<()>;

/// Trigger listener configuration
#[derive(Debug, Clone)]
pub struct TriggerListenerConfig {
    /// Listener identifier for logging
    pub id: String,

    /// Bind address (e.g., "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,

    /// Token that wakes the collector (case-sensitive, exact match)
    pub token: String,

    /// Maximum bytes read from a single connection
    pub max_frame: usize,

    /// Wake queue depth (signals beyond this are dropped)
    pub queue_depth: usize,
}

impl Default for TriggerListenerConfig {
    fn default() -> Self {
        Self {
            id: "trigger".into(),
            address: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            token: DEFAULT_TOKEN.into(),
            max_frame: DEFAULT_MAX_FRAME,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl TriggerListenerConfig {
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

/// Trigger listener metrics
#[derive(Debug, Default)]
pub struct TriggerMetrics {
    /// Connections accepted
    pub connections_total: AtomicU64,

    /// Payloads that matched the token
    pub signals_matched: AtomicU64,

    /// Matched signals dropped because the wake queue was full
    pub signals_dropped: AtomicU64,

    /// Payloads that did not match the token
    pub payloads_rejected: AtomicU64,
}

impl TriggerMetrics {
    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> TriggerMetricsSnapshot {
        TriggerMetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            signals_matched: self.signals_matched.load(Ordering::Relaxed),
            signals_dropped: self.signals_dropped.load(Ordering::Relaxed),
            payloads_rejected: self.payloads_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of trigger metrics
#[derive(Debug, Clone, Copy)]
pub struct TriggerMetricsSnapshot {
    pub connections_total: u64,
    pub signals_matched: u64,
    pub signals_dropped: u64,
    pub payloads_rejected: u64,
}

/// Trigger listener
///
/// Created together with the receiver half of its wake channel; the
/// collector consumes wakes from the receiver while `run` owns the
/// accept loop.
pub struct TriggerListener {
    config: TriggerListenerConfig,
    wake_tx: mpsc::Sender<()>,
    metrics: Arc<TriggerMetrics>,
}

impl TriggerListener {
    /// Create a new listener and the wake receiver it feeds
    pub fn new(config: TriggerListenerConfig) -> (Self, WakeReceiver) {
        let (wake_tx, wake_rx) = mpsc::channel(config.queue_depth.max(1));

        let listener = Self {
            config,
            wake_tx,
            metrics: Arc::new(TriggerMetrics::default()),
        };

        (listener, wake_rx)
    }

    /// Get a handle to the listener metrics
    pub fn metrics(&self) -> Arc<TriggerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the accept loop until cancelled
    ///
    /// The listener never exits on its own; process shutdown
    /// (cancellation) is the only way to stop it.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), TriggerError> {
        let bind_addr = self.config.bind_address();

        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| TriggerError::Bind {
                address: bind_addr.clone(),
                source: e,
            })?;

        tracing::info!(
            listener_id = %self.config.id,
            address = %bind_addr,
            "trigger listener waiting for signals"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(listener_id = %self.config.id, "trigger listener stopped");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!(listener_id = %self.config.id, error = %e, "accept failed");
                            continue;
                        }
                    };

                    self.metrics.connections_total.fetch_add(1, Ordering::Relaxed);

                    let token = self.config.token.clone();
                    let max_frame = self.config.max_frame;
                    let wake_tx = self.wake_tx.clone();
                    let metrics = Arc::clone(&self.metrics);

                    tokio::spawn(async move {
                        handle_connection(stream, peer, token, max_frame, wake_tx, metrics).await;
                    });
                }
            }
        }
    }
}

/// Read one payload from the connection and forward a wake on match
async fn handle_connection(
    mut stream: TcpStream,
    peer: std::net::SocketAddr,
    token: String,
    max_frame: usize,
    wake_tx: mpsc::Sender<()>,
    metrics: Arc<TriggerMetrics>,
) {
    let mut payload = Vec::with_capacity(token.len() + 2);

    // The sender writes the token and closes, so read to EOF (bounded).
    let mut limited = (&mut stream).take(max_frame as u64);
    if let Err(e) = limited.read_to_end(&mut payload).await {
        tracing::debug!(peer = %peer, error = %e, "trigger read failed");
        return;
    }

    // Tolerate a trailing newline from line-oriented senders.
    let received = payload.as_slice().trim_ascii();

    if received != token.as_bytes() {
        metrics.payloads_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            peer = %peer,
            bytes = payload.len(),
            "dropping connection with non-matching trigger payload"
        );
        return;
    }

    metrics.signals_matched.fetch_add(1, Ordering::Relaxed);

    match wake_tx.try_send(()) {
        Ok(()) => {
            tracing::debug!(peer = %peer, "trigger signal queued");
        }
        Err(mpsc::error::TrySendError::Full(())) => {
            // A pull is in flight and one signal is already queued.
            metrics.signals_dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(peer = %peer, "wake queue full, trigger signal dropped");
        }
        Err(mpsc::error::TrySendError::Closed(())) => {
            tracing::warn!(peer = %peer, "wake receiver gone, trigger signal discarded");
        }
    }
}

#[cfg(test)]
#[path = "listener_test.rs"]
mod listener_test;
