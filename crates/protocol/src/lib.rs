//! Baton wire types
//!
//! Shared protocol pieces for the relay pipeline:
//!
//! - [`tag`] - the tag-delimited text codec the producer endpoint uses
//!   to publish its record set
//! - [`SourceId`] - logical identity of a submitting component
//! - [`Envelope`] - the identified record batch the collector submits
//!   to the ingestion sink
//!
//! The sink treats submitted payloads as opaque bytes; `Envelope` only
//! binds the collector side of the exchange.

pub mod tag;

mod envelope;
mod source;

pub use envelope::Envelope;
pub use source::SourceId;
