//! Producer endpoint error types

/// Errors from the producer endpoint
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// Failed to bind to address
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Configured read path is not a valid route
    #[error("invalid endpoint path '{0}': must start with '/'")]
    InvalidPath(String),

    /// HTTP server error
    #[error("HTTP error: {0}")]
    Http(String),
}
