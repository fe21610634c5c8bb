//! Sink error types
//!
//! Bind, address, and TLS errors are startup-fatal: the sink refuses
//! to run rather than run insecurely or half-configured. Storage
//! errors surface per-request as failed submissions.

/// Errors from the ingestion sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Failed to bind to address
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Configured listen address does not parse
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    /// TLS configuration error (missing or unreadable material)
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(#[from] turso::Error),

    /// Storage returned an unusable row
    #[error("persisted entry came back without a sequence id")]
    MissingSequence,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server error
    #[error("HTTP error: {0}")]
    Http(String),
}
