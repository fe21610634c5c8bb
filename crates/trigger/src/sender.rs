//! Trigger sender
//!
//! Connects, writes the literal token, flushes, and closes. No
//! response is read and nothing re-sends on failure - the signal is
//! at-most-once by contract.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::TriggerError;

/// Send a one-shot trigger token to `address`
///
/// Returns as soon as the token is flushed and the write side is shut
/// down. A connection failure means the signal is lost; callers log it
/// and move on.
pub async fn send_trigger(address: &str, token: &str) -> Result<(), TriggerError> {
    let mut stream = TcpStream::connect(address)
        .await
        .map_err(|e| TriggerError::Connect {
            address: address.to_string(),
            source: e,
        })?;

    stream.write_all(token.as_bytes()).await?;
    stream.flush().await?;

    // Half-close so the listener's bounded read sees EOF immediately.
    stream.shutdown().await?;

    tracing::debug!(address = %address, "trigger sent");
    Ok(())
}
