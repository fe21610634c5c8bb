//! Trigger command - send a one-shot wake signal
//!
//! Operator's version of what the producer does after a publish:
//! connect to the collector's trigger listener, write the token,
//! close. No response, no retry.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use baton_trigger::send_trigger;

use crate::cmd::serve::load_config;

/// Trigger command arguments
#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Trigger listener address (host:port); defaults to the config's
    /// [trigger] port on localhost
    #[arg(short, long)]
    pub address: Option<String>,

    /// Token to send; defaults to the config's [trigger] token
    #[arg(short, long)]
    pub token: Option<String>,
}

/// Run the trigger command
pub async fn run(args: TriggerArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    let address = args
        .address
        .unwrap_or_else(|| format!("127.0.0.1:{}", config.trigger.port));
    let token = args.token.unwrap_or_else(|| config.trigger.token.clone());

    send_trigger(&address, &token)
        .await
        .with_context(|| format!("failed to send trigger to {}", address))?;

    tracing::info!(address = %address, "trigger sent");
    Ok(())
}
