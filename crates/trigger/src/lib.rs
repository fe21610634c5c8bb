//! Trigger Channel - one-shot TCP wake-up notifications
//!
//! A connection-oriented, fire-and-forget signal: the producer opens a
//! TCP connection to the collector's trigger address, writes a fixed
//! literal token, and closes. The listener matches the token and wakes
//! the collector; anything else is dropped on the floor.
//!
//! # Delivery semantics
//!
//! At-most-once. There is no acknowledgment, no retry, and no delivery
//! guarantee - a signal sent while the receiver is down is simply lost.
//! These semantics are part of the contract and must not be upgraded to
//! guaranteed delivery.
//!
//! # Example
//!
//! ```ignore
//! use baton_trigger::{TriggerListener, TriggerListenerConfig, send_trigger};
//!
//! let (listener, mut wake_rx) = TriggerListener::new(TriggerListenerConfig::default());
//! tokio::spawn(listener.run(cancel.clone()));
//!
//! send_trigger("127.0.0.1:5051", "SUCCESS").await?;
//! wake_rx.recv().await; // collector transitions Idle -> Pulling
//! ```

mod error;
mod listener;
mod sender;

pub use error::TriggerError;
pub use listener::{
    TriggerListener, TriggerListenerConfig, TriggerMetrics, TriggerMetricsSnapshot, WakeReceiver,
};
pub use sender::send_trigger;
