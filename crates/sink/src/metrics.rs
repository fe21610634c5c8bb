//! Sink metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion sink metrics
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Submissions received (any outcome)
    pub requests_received: AtomicU64,

    /// Submissions rejected by authentication
    pub auth_failures: AtomicU64,

    /// Entries durably persisted
    pub entries_persisted: AtomicU64,

    /// Payload bytes durably persisted
    pub bytes_persisted: AtomicU64,

    /// Submissions failed on storage
    pub storage_errors: AtomicU64,
}

impl SinkMetrics {
    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            entries_persisted: self.entries_persisted.load(Ordering::Relaxed),
            bytes_persisted: self.bytes_persisted.load(Ordering::Relaxed),
            storage_errors: self.storage_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy)]
pub struct SinkMetricsSnapshot {
    pub requests_received: u64,
    pub auth_failures: u64,
    pub entries_persisted: u64,
    pub bytes_persisted: u64,
    pub storage_errors: u64,
}
