//! Collector error types
//!
//! Everything here is non-fatal to the collector: a failed cycle is
//! logged and the next trigger starts fresh.

/// Errors from a collector cycle
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// Failed to build the HTTP client
    #[error("failed to initialize collector: {0}")]
    Init(String),

    /// Transport failure while pulling from the producer
    #[error("pull from producer failed: {0}")]
    Pull(#[source] reqwest::Error),

    /// Producer answered with a non-success status
    #[error("producer returned status {0}")]
    ProducerStatus(reqwest::StatusCode),

    /// Transport failure while submitting to the sink
    #[error("submit to sink failed: {0}")]
    Submit(#[source] reqwest::Error),

    /// Sink refused the envelope
    #[error("sink rejected envelope with status {0}")]
    SinkRejected(reqwest::StatusCode),
}
