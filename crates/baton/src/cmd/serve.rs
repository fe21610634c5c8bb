//! Serve command - run the relay components
//!
//! One process can host any subset of the three components: producer
//! (record store + endpoint + notify), collector (trigger listener +
//! pull-and-forward), and sink. All of them run as supervised tasks
//! owned by a single [`Supervisor`]; ctrl-c or any component failure
//! shuts the whole process down.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use baton_config::Config;
use baton_producer::RecordStore;

use crate::lifecycle::Supervisor;
use crate::runtime;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to configs/config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Which components this invocation runs
///
/// The mask is intersected with the `enabled` flags in the config:
/// `baton sink` with `[sink] enabled = false` runs nothing.
#[derive(Debug, Clone, Copy)]
pub struct Components {
    pub producer: bool,
    pub collector: bool,
    pub sink: bool,
}

impl Components {
    /// Every component the config enables
    pub fn all() -> Self {
        Self {
            producer: true,
            collector: true,
            sink: true,
        }
    }

    /// Producer only
    pub fn producer_only() -> Self {
        Self {
            producer: true,
            collector: false,
            sink: false,
        }
    }

    /// Collector only (includes its trigger listener)
    pub fn collector_only() -> Self {
        Self {
            producer: false,
            collector: true,
            sink: false,
        }
    }

    /// Sink only
    pub fn sink_only() -> Self {
        Self {
            producer: false,
            collector: false,
            sink: true,
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs, components: Components) -> Result<()> {
    let config_path = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "baton starting"
    );

    let config = load_config(args.config)?;

    run_components(config, components).await?;

    tracing::info!("baton shutdown complete");
    Ok(())
}

/// Load configuration: explicit path must exist; otherwise try the
/// default paths and fall back to built-in defaults
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(&path).context("failed to load configuration")
        }
        None => {
            let default_paths = [
                PathBuf::from("configs/config.toml"),
                PathBuf::from("config.toml"),
            ];

            for path in &default_paths {
                if path.exists() {
                    tracing::info!(config = %path.display(), "using config file");
                    return Config::from_file(path).context("failed to load configuration");
                }
            }

            tracing::info!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Spawn the selected components and run until shutdown
async fn run_components(config: Config, components: Components) -> Result<()> {
    let mut supervisor = Supervisor::new();
    let cancel = supervisor.cancel_token();

    let run_sink = components.sink && config.sink.enabled;
    let run_collector = components.collector && config.collector.enabled;
    let run_producer = components.producer && config.producer.enabled;

    if !(run_sink || run_collector || run_producer) {
        anyhow::bail!(
            "no components enabled - check the [producer], [collector], and [sink] sections"
        );
    }

    if run_sink {
        let sink = runtime::build_sink(&config.sink);
        supervisor.spawn("sink", sink.run(cancel.clone()));
    }

    // Collector before producer so its trigger listener is (very
    // likely) up when the producer's first notify fires.
    if run_collector {
        let (listener, wake_rx) = runtime::build_trigger_listener(&config.trigger);
        supervisor.spawn("trigger-listener", listener.run(cancel.clone()));

        let collector = runtime::build_collector(&config.collector)?;
        supervisor.spawn("collector", collector.run(cancel.clone(), wake_rx));
    }

    if run_producer {
        let store = Arc::new(RecordStore::new());

        let endpoint = runtime::build_producer_endpoint(&config.producer, Arc::clone(&store));
        supervisor.spawn("producer-endpoint", endpoint.run(cancel.clone()));

        supervisor.spawn(
            "producer-publisher",
            runtime::run_publisher(config.producer.clone(), store, cancel.clone()),
        );
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            supervisor.shutdown();
        }
        _ = cancel.cancelled() => {}
    }

    supervisor.wait().await
}
