//! Trigger channel error types

/// Errors from the trigger channel
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// Failed to bind the listener
    #[error("failed to bind trigger listener to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to connect to the trigger address
    #[error("failed to connect to trigger address {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while sending or receiving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
