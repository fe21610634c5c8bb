//! Append-only log store
//!
//! Every accepted submission becomes one row in `log_entries`, written
//! durably before the request is acknowledged. The core never reads
//! the table back - it is write-only here; reads are an operator
//! concern.
//!
//! Writers are serialized through a single async mutex so that
//! sequence assignment and the receipt timestamp move together:
//! sequence ids are strictly increasing and `received_at` is
//! non-decreasing in sequence order, even under concurrent
//! submissions.

use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;
use turso::{Builder, Database};

use baton_protocol::SourceId;

use crate::error::SinkError;

const SCHEMA_LOG_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS log_entries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    received_at TEXT NOT NULL,
    source TEXT NOT NULL,
    client_addr TEXT NOT NULL,
    headers TEXT NOT NULL,
    payload BLOB NOT NULL
)
"#;

/// A submission about to be persisted
#[derive(Debug)]
pub struct NewLogEntry {
    /// Authenticated source identity
    pub source: SourceId,

    /// Peer address the submission arrived from
    pub client_addr: String,

    /// Request headers, serialized as a JSON object
    pub headers: String,

    /// Raw payload bytes, verbatim
    pub payload: Vec<u8>,
}

/// Receipt for a persisted entry
#[derive(Debug, Clone)]
pub struct AppendReceipt {
    /// Assigned sequence id (strictly increasing)
    pub sequence_id: i64,

    /// UTC receipt timestamp (RFC 3339)
    pub received_at: String,
}

/// Append-only store backed by SQLite
pub struct LogStore {
    db: Database,
    write_serial: Mutex<()>,
}

impl LogStore {
    /// Open a file-backed store, creating the schema if needed
    pub async fn open(path: &str) -> Result<Self, SinkError> {
        tracing::info!(path = %path, "opening log store");
        let db = Builder::new_local(path).build().await?;
        let store = Self {
            db,
            write_serial: Mutex::new(()),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub async fn memory() -> Result<Self, SinkError> {
        let db = Builder::new_local(":memory:").build().await?;
        let store = Self {
            db,
            write_serial: Mutex::new(()),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), SinkError> {
        let conn = self.db.connect()?;
        conn.execute(SCHEMA_LOG_ENTRIES, ()).await?;
        Ok(())
    }

    /// Append one entry, durably, and return its receipt
    ///
    /// The row is on disk before this returns; callers acknowledge the
    /// submission only after a successful append.
    pub async fn append(&self, entry: NewLogEntry) -> Result<AppendReceipt, SinkError> {
        // Timestamp and insert happen under one lock so receipts are
        // ordered consistently with sequence ids.
        let _guard = self.write_serial.lock().await;

        let received_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                r#"
                INSERT INTO log_entries (received_at, source, client_addr, headers, payload)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING seq
                "#,
                (
                    received_at.clone(),
                    entry.source.as_str().to_string(),
                    entry.client_addr,
                    entry.headers,
                    entry.payload,
                ),
            )
            .await?;

        let row = rows.next().await?.ok_or(SinkError::MissingSequence)?;
        let sequence_id = row
            .get_value(0)?
            .as_integer()
            .copied()
            .ok_or(SinkError::MissingSequence)?;

        Ok(AppendReceipt {
            sequence_id,
            received_at,
        })
    }

    /// Read every entry back, in sequence order (test support only -
    /// the core API is write-only)
    #[cfg(test)]
    pub(crate) async fn fetch_all(&self) -> Result<Vec<StoredLogEntry>, SinkError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT seq, received_at, source, client_addr, headers, payload \
                 FROM log_entries ORDER BY seq",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let empty = String::new();
            entries.push(StoredLogEntry {
                seq: row.get_value(0)?.as_integer().copied().unwrap_or(0),
                received_at: row.get_value(1)?.as_text().unwrap_or(&empty).clone(),
                source: row.get_value(2)?.as_text().unwrap_or(&empty).clone(),
                client_addr: row.get_value(3)?.as_text().unwrap_or(&empty).clone(),
                headers: row.get_value(4)?.as_text().unwrap_or(&empty).clone(),
                payload: row.get_value(5)?.as_blob().cloned().unwrap_or_default(),
            });
        }

        Ok(entries)
    }
}

/// A row read back from the store (test support)
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct StoredLogEntry {
    pub seq: i64,
    pub received_at: String,
    pub source: String,
    pub client_addr: String,
    pub headers: String,
    pub payload: Vec<u8>,
}
