//! Record store - version-stamped immutable snapshots
//!
//! Replaces the usual global mutable list with publish/snapshot
//! semantics: `publish` swaps in a complete new record set behind an
//! `Arc`, and `snapshot` hands the current one out. Readers hold the
//! Arc for as long as they need; no lock is exposed and no reader can
//! observe a torn list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Owner of the producer's record set
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Arc<Vec<String>>>,
    version: AtomicU64,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with records
    pub fn with_records(records: Vec<String>) -> Self {
        let store = Self::new();
        store.publish(records);
        store
    }

    /// Publish a new record set, replacing the current one
    ///
    /// Returns the new version number. In-flight readers keep the
    /// snapshot they already hold.
    pub fn publish(&self, records: Vec<String>) -> u64 {
        *self.records.write() = Arc::new(records);
        self.version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.records.read())
    }

    /// Current version (0 until the first publish)
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let store = RecordStore::new();

        store.publish(vec!["a".into(), "b".into()]);
        assert_eq!(*store.snapshot(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.version(), 1);

        store.publish(vec!["c".into()]);
        assert_eq!(*store.snapshot(), vec!["c".to_string()]);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_publish() {
        let store = RecordStore::with_records(vec!["old".into()]);

        let held = store.snapshot();
        store.publish(vec!["new".into()]);

        // The held snapshot is unaffected by the publish.
        assert_eq!(*held, vec!["old".to_string()]);
        assert_eq!(*store.snapshot(), vec!["new".to_string()]);
    }

    #[test]
    fn test_order_is_preserved() {
        let records: Vec<String> = (0..100).map(|i| format!("record {}", i)).collect();
        let store = RecordStore::with_records(records.clone());
        assert_eq!(*store.snapshot(), records);
    }
}
