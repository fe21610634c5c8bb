//! Producer - owns the record set and serves it over HTTP
//!
//! The producer holds an ordered set of text records (inventory or
//! transaction lines) and publishes it at a configurable path, encoded
//! with the tag codec. Whoever mutates the record set does so by
//! publishing a whole new snapshot; readers always see either the full
//! old list or the full new one, never a mix.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use baton_producer::{Endpoint, EndpointConfig, RecordStore};
//!
//! let store = Arc::new(RecordStore::new());
//! store.publish(vec!["101 Drill 2 89.99".into()]);
//!
//! let endpoint = Endpoint::new(EndpointConfig::default(), Arc::clone(&store));
//! endpoint.run(cancel).await?;
//! ```

mod endpoint;
mod error;
mod store;

pub use endpoint::{Endpoint, EndpointConfig, EndpointMetrics, EndpointMetricsSnapshot};
pub use error::EndpointError;
pub use store::RecordStore;
