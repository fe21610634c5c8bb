//! Runtime wiring
//!
//! Maps the TOML configuration onto component runtime structs and
//! hosts the producer's publish-then-notify glue. The components
//! themselves know nothing about the config file format.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use baton_collector::Collector;
use baton_producer::{Endpoint, EndpointConfig, RecordStore};
use baton_sink::{CredentialStore, SecurityMode, Sink, SinkConfig, TlsSettings};
use baton_trigger::{TriggerListener, TriggerListenerConfig, WakeReceiver, send_trigger};

/// Demo record set used when no records file is configured
pub fn demo_records() -> Vec<String> {
    vec![
        "101 18V Cordless Drill 2 89.99".into(),
        "102 6-inch Wood Clamp 4 12.50".into(),
        "103 Carpenter's Hammer 1 19.99".into(),
    ]
}

/// Build the producer endpoint from config
pub fn build_producer_endpoint(
    config: &baton_config::ProducerConfig,
    store: Arc<RecordStore>,
) -> Endpoint {
    Endpoint::new(
        EndpointConfig {
            id: "producer".into(),
            address: config.address.clone(),
            port: config.port,
            path: config.path.clone(),
            tag: config.tag.clone(),
        },
        store,
    )
}

/// Build the trigger listener from config
pub fn build_trigger_listener(
    config: &baton_config::TriggerConfig,
) -> (TriggerListener, WakeReceiver) {
    TriggerListener::new(TriggerListenerConfig {
        id: "trigger".into(),
        address: config.address.clone(),
        port: config.port,
        token: config.token.clone(),
        queue_depth: config.queue_depth,
        ..Default::default()
    })
}

/// Build the collector from config
pub fn build_collector(config: &baton_config::CollectorConfig) -> Result<Collector> {
    Collector::new(baton_collector::CollectorConfig {
        id: config.id.clone(),
        producer_url: config.producer_url.clone(),
        tag: config.tag.clone(),
        sink_url: config.sink_url.clone(),
        api_token: config.api_token.clone(),
        request_timeout: config.request_timeout,
    })
    .context("failed to build collector")
}

/// Build the sink from config
pub fn build_sink(config: &baton_config::SinkConfig) -> Sink {
    let credentials = CredentialStore::from_entries(
        config
            .credentials
            .iter()
            .map(|entry| (entry.source.as_str(), entry.token.as_str())),
    );

    let security = TlsSettings {
        mode: match config.security {
            baton_config::SecurityMode::Plain => SecurityMode::Plain,
            baton_config::SecurityMode::Tls => SecurityMode::Tls,
            baton_config::SecurityMode::Mutual => SecurityMode::Mutual,
        },
        cert_path: config.cert_path.clone(),
        key_path: config.key_path.clone(),
        client_ca_path: config.client_ca_path.clone(),
    };

    Sink::new(
        SinkConfig {
            id: "sink".into(),
            address: config.address.clone(),
            port: config.port,
            db_path: config.db_path.clone(),
            security,
        },
        credentials,
    )
}

/// Producer publish-then-notify task
///
/// Publishes the record set (from the configured file, or the demo
/// set), fires the trigger at the collector, and - when a refresh
/// interval is configured - repeats on that cadence. The first publish
/// failing is a startup error; later refresh failures only log.
pub async fn run_publisher(
    config: baton_config::ProducerConfig,
    store: Arc<RecordStore>,
    cancel: CancellationToken,
) -> Result<()> {
    publish_and_notify(&config, &store).await?;

    let Some(interval) = config.refresh_interval else {
        // Publish-once mode: the endpoint keeps serving the snapshot.
        return Ok(());
    };

    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(100)));
    ticker.tick().await; // the first tick fires immediately

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {
                if let Err(e) = publish_and_notify(&config, &store).await {
                    tracing::warn!(error = %e, "republish failed, keeping previous record set");
                }
            }
        }
    }
}

async fn publish_and_notify(
    config: &baton_config::ProducerConfig,
    store: &RecordStore,
) -> Result<()> {
    let records = load_records(config)?;
    let count = records.len();
    let version = store.publish(records);

    tracing::info!(records = count, version, "record set published");

    if let Some(notify) = &config.notify {
        // Fire-and-forget: a lost signal stays lost.
        if let Err(e) = send_trigger(&notify.target_address(), &notify.token).await {
            tracing::warn!(
                target = %notify.target_address(),
                error = %e,
                "trigger not delivered"
            );
        }
    }

    Ok(())
}

/// Load records from the configured file, one per line
fn load_records(config: &baton_config::ProducerConfig) -> Result<Vec<String>> {
    let Some(path) = &config.records_file else {
        return Ok(demo_records());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read records file {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
