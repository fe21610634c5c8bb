//! Collector - trigger-driven pull-and-forward relay
//!
//! The collector sits between the producer endpoint and the ingestion
//! sink. It has exactly two states:
//!
//! - **Idle**: blocked on the trigger listener's wake channel
//! - **Pulling**: one pull-and-forward cycle in flight
//!
//! A matched trigger token moves it Idle -> Pulling. The cycle issues
//! one GET to the producer endpoint, decodes the body with the agreed
//! tag, wraps the records in an [`Envelope`] carrying the collector's
//! own identity, and POSTs it to the sink's `/log` with a bearer
//! token. Any failure along the way is logged and the collector
//! returns to Idle - no retry, no buffering, that cycle's data is
//! lost. This is the contract, not an oversight.
//!
//! Pulls are strictly sequential: the wake channel holds at most one
//! queued signal while a pull runs (see `baton-trigger`).

mod error;

pub use error::CollectorError;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use baton_protocol::{Envelope, tag};
use baton_trigger::WakeReceiver;
use tokio_util::sync::CancellationToken;

/// Default request timeout for pull and submit
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sink submit path (fixed by the sink's API)
const SINK_LOG_PATH: &str = "/log";

/// Collector configuration
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Collector identity - becomes the envelope's source id
    pub id: String,

    /// Producer endpoint URL (e.g., "http://127.0.0.1:8000/records")
    pub producer_url: String,

    /// Tag name agreed with the producer
    pub tag: String,

    /// Sink base URL (e.g., "http://127.0.0.1:9300")
    pub sink_url: String,

    /// Bearer token registered at the sink
    pub api_token: String,

    /// Timeout applied to each pull and submit request
    pub request_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            id: "collector".into(),
            producer_url: "http://127.0.0.1:8000/records".into(),
            tag: "record".into(),
            sink_url: "http://127.0.0.1:9300".into(),
            api_token: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CollectorConfig {
    /// Full URL of the sink's submit endpoint
    pub fn submit_url(&self) -> String {
        format!("{}{}", self.sink_url.trim_end_matches('/'), SINK_LOG_PATH)
    }
}

/// Collector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Waiting on the trigger channel
    Idle,
    /// Pull-and-forward cycle in flight
    Pulling,
}

const STATE_IDLE: u8 = 0;
const STATE_PULLING: u8 = 1;

/// Collector metrics
#[derive(Debug, Default)]
pub struct CollectorMetrics {
    /// Cycles started (one per consumed wake)
    pub pulls_started: AtomicU64,

    /// Cycles abandoned on any failure
    pub pulls_failed: AtomicU64,

    /// Envelopes accepted by the sink
    pub envelopes_submitted: AtomicU64,

    /// Records relayed inside accepted envelopes
    pub records_relayed: AtomicU64,
}

impl CollectorMetrics {
    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> CollectorMetricsSnapshot {
        CollectorMetricsSnapshot {
            pulls_started: self.pulls_started.load(Ordering::Relaxed),
            pulls_failed: self.pulls_failed.load(Ordering::Relaxed),
            envelopes_submitted: self.envelopes_submitted.load(Ordering::Relaxed),
            records_relayed: self.records_relayed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of collector metrics
#[derive(Debug, Clone, Copy)]
pub struct CollectorMetricsSnapshot {
    pub pulls_started: u64,
    pub pulls_failed: u64,
    pub envelopes_submitted: u64,
    pub records_relayed: u64,
}

/// Trigger-driven collector
pub struct Collector {
    config: CollectorConfig,
    client: reqwest::Client,
    state: AtomicU8,
    metrics: Arc<CollectorMetrics>,
}

impl Collector {
    /// Create a new collector
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built (e.g., TLS
    /// backend misconfiguration).
    pub fn new(config: CollectorConfig) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("baton-collector/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CollectorError::Init(e.to_string()))?;

        Ok(Self {
            config,
            client,
            state: AtomicU8::new(STATE_IDLE),
            metrics: Arc::new(CollectorMetrics::default()),
        })
    }

    /// Current state
    pub fn state(&self) -> CollectorState {
        match self.state.load(Ordering::Relaxed) {
            STATE_PULLING => CollectorState::Pulling,
            _ => CollectorState::Idle,
        }
    }

    /// Get a handle to the collector metrics
    pub fn metrics(&self) -> Arc<CollectorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the collector until cancelled
    ///
    /// Consumes wake signals from `wake_rx` and performs one cycle per
    /// signal. Cycle failures are logged and never end the loop.
    pub async fn run(
        self,
        cancel: CancellationToken,
        mut wake_rx: WakeReceiver,
    ) -> Result<(), CollectorError> {
        tracing::info!(
            collector_id = %self.config.id,
            producer = %self.config.producer_url,
            sink = %self.config.submit_url(),
            "collector idle, waiting for trigger"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(collector_id = %self.config.id, "collector stopped");
                    return Ok(());
                }
                wake = wake_rx.recv() => {
                    if wake.is_none() {
                        // Trigger listener went away; nothing will ever wake us.
                        tracing::info!(collector_id = %self.config.id, "wake channel closed, collector stopped");
                        return Ok(());
                    }

                    self.state.store(STATE_PULLING, Ordering::Relaxed);
                    self.metrics.pulls_started.fetch_add(1, Ordering::Relaxed);

                    if let Err(e) = self.pull_and_forward().await {
                        self.metrics.pulls_failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            collector_id = %self.config.id,
                            error = %e,
                            "cycle abandoned, returning to idle"
                        );
                    }

                    self.state.store(STATE_IDLE, Ordering::Relaxed);
                }
            }
        }
    }

    /// One pull-and-forward cycle
    async fn pull_and_forward(&self) -> Result<(), CollectorError> {
        // Pull the published record set.
        let response = self
            .client
            .get(&self.config.producer_url)
            .send()
            .await
            .map_err(CollectorError::Pull)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::ProducerStatus(status));
        }

        let body = response.text().await.map_err(CollectorError::Pull)?;
        let records = tag::decode(&body, &self.config.tag);

        tracing::debug!(
            collector_id = %self.config.id,
            records = records.len(),
            "decoded producer response"
        );

        // Forward to the sink.
        let record_count = records.len();
        let envelope = Envelope::new(self.config.id.as_str(), records);
        let payload = envelope.to_bytes();
        let bytes = payload.len();

        let response = self
            .client
            .post(self.config.submit_url())
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(CollectorError::Submit)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::SinkRejected(status));
        }

        self.metrics
            .envelopes_submitted
            .fetch_add(1, Ordering::Relaxed);
        self.metrics
            .records_relayed
            .fetch_add(record_count as u64, Ordering::Relaxed);

        tracing::info!(
            collector_id = %self.config.id,
            records = record_count,
            bytes,
            "envelope accepted by sink"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collector_starts_idle() {
        let collector = Collector::new(CollectorConfig::default()).unwrap();
        assert_eq!(collector.state(), CollectorState::Idle);
        assert_eq!(collector.metrics().snapshot().pulls_started, 0);
    }

    #[test]
    fn test_submit_url_joins_cleanly() {
        let config = CollectorConfig {
            sink_url: "http://127.0.0.1:9300".into(),
            ..Default::default()
        };
        assert_eq!(config.submit_url(), "http://127.0.0.1:9300/log");

        let config = CollectorConfig {
            sink_url: "http://127.0.0.1:9300/".into(),
            ..Default::default()
        };
        assert_eq!(config.submit_url(), "http://127.0.0.1:9300/log");
    }
}
