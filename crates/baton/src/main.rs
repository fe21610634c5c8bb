//! Baton - triggered record relay pipeline
//!
//! # Usage
//!
//! ```bash
//! # Run every enabled component in one process
//! baton
//! baton serve --config configs/config.toml
//!
//! # Run a single component
//! baton producer
//! baton collector
//! baton sink
//!
//! # Send a one-shot trigger to a waiting collector
//! baton trigger --address 127.0.0.1:5051
//! ```

mod cmd;
mod lifecycle;
mod runtime;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use baton_config::{Config, LogFormat};

/// Baton - triggered record relay pipeline
#[derive(Parser, Debug)]
#[command(name = "baton")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every enabled component in one process
    Serve(cmd::serve::ServeArgs),

    /// Run only the producer (record store + endpoint + notify)
    Producer(cmd::serve::ServeArgs),

    /// Run only the collector (trigger listener + pull-and-forward)
    Collector(cmd::serve::ServeArgs),

    /// Run only the ingestion sink
    Sink(cmd::serve::ServeArgs),

    /// Send a one-shot trigger to a waiting collector
    Trigger(cmd::trigger::TriggerArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            init_logging_for(&cli.log_level, args.config.as_deref())?;
            cmd::serve::run(args, cmd::serve::Components::all()).await
        }
        Some(Command::Producer(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            init_logging_for(&cli.log_level, args.config.as_deref())?;
            cmd::serve::run(args, cmd::serve::Components::producer_only()).await
        }
        Some(Command::Collector(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            init_logging_for(&cli.log_level, args.config.as_deref())?;
            cmd::serve::run(args, cmd::serve::Components::collector_only()).await
        }
        Some(Command::Sink(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            init_logging_for(&cli.log_level, args.config.as_deref())?;
            cmd::serve::run(args, cmd::serve::Components::sink_only()).await
        }
        Some(Command::Trigger(args)) => {
            init_logging_for(&cli.log_level, cli.config.as_deref())?;
            cmd::trigger::run(args, cli.config).await
        }
        // No subcommand = serve (default behavior)
        None => {
            init_logging_for(&cli.log_level, cli.config.as_deref())?;
            let args = cmd::serve::ServeArgs { config: cli.config };
            cmd::serve::run(args, cmd::serve::Components::all()).await
        }
    }
}

/// Resolve log settings (CLI flag > config file > defaults) and
/// initialize the subscriber
fn init_logging_for(cli_level: &Option<String>, config_path: Option<&std::path::Path>) -> Result<()> {
    let mut level = "info".to_string();
    let mut format = LogFormat::Console;

    if let Some(path) = config_path
        && path.exists()
        && let Ok(config) = Config::from_file(path)
    {
        level = config.log.level.as_str().to_string();
        format = config.log.format;
    }

    if let Some(flag) = cli_level {
        level = flag.clone();
    }

    let filter = EnvFilter::try_new(&level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
