//! Envelope - the identified record batch submitted to the sink
//!
//! Built by the collector once per pull cycle and immutable after
//! construction. Serialized as JSON on the wire; the sink persists the
//! bytes verbatim without parsing them.

use serde::{Deserialize, Serialize};

use crate::SourceId;

/// An identified batch of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Identity of the submitting component
    pub source: SourceId,

    /// Decoded records, in publication order
    pub records: Vec<String>,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(source: impl Into<SourceId>, records: Vec<String>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// Number of records in the envelope
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Serialize to the JSON wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        // Serialization of a string/vec pair cannot fail.
        serde_json::to_vec(self).expect("envelope serialization")
    }
}
