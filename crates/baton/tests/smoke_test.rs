//! Smoke tests for the baton relay
//!
//! These verify end-to-end functionality with all three components on
//! real localhost sockets: producer publishes, trigger wakes the
//! collector, the collector pulls, decodes, and submits, and the sink
//! authenticates and persists.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use baton_collector::{Collector, CollectorConfig, CollectorMetrics};
use baton_producer::{Endpoint, EndpointConfig, RecordStore};
use baton_protocol::Envelope;
use baton_sink::{CredentialStore, Sink, SinkConfig, TlsSettings};
use baton_trigger::{TriggerListener, TriggerListenerConfig, send_trigger};

const API_TOKEN: &str = "api_key_for_collector_e2e";
const COLLECTOR_ID: &str = "collector-e2e";
const TRIGGER_TOKEN: &str = "SUCCESS";

fn sample_records() -> Vec<String> {
    vec![
        "101 18V Cordless Drill 2 89.99".into(),
        "102 6-inch Wood Clamp 4 12.50".into(),
        "103 Carpenter's Hammer 1 19.99".into(),
    ]
}

/// Everything a test needs from a running pipeline
struct Pipeline {
    cancel: CancellationToken,
    collector_metrics: Arc<CollectorMetrics>,
    sink_metrics: Arc<baton_sink::SinkMetrics>,
    trigger_addr: String,
    sink_base: String,
}

/// Spin up sink + producer + trigger listener + collector on the given
/// ports and wait until every listener answers
async fn start_pipeline(producer_port: u16, trigger_port: u16, sink_port: u16) -> Pipeline {
    let cancel = CancellationToken::new();

    // Sink: plain transport, in-memory store.
    let mut credentials = CredentialStore::new();
    credentials.insert(COLLECTOR_ID, API_TOKEN);
    let sink = Sink::new(
        SinkConfig {
            id: "sink-e2e".into(),
            address: "127.0.0.1".into(),
            port: sink_port,
            db_path: ":memory:".into(),
            security: TlsSettings::default(),
        },
        credentials,
    );
    let sink_metrics = sink.metrics();
    tokio::spawn(sink.run(cancel.clone()));

    // Trigger listener + collector.
    let (listener, wake_rx) = TriggerListener::new(TriggerListenerConfig {
        id: "trigger-e2e".into(),
        address: "127.0.0.1".into(),
        port: trigger_port,
        token: TRIGGER_TOKEN.into(),
        ..Default::default()
    });
    tokio::spawn(listener.run(cancel.clone()));

    let collector = Collector::new(CollectorConfig {
        id: COLLECTOR_ID.into(),
        producer_url: format!("http://127.0.0.1:{}/records", producer_port),
        tag: "record".into(),
        sink_url: format!("http://127.0.0.1:{}", sink_port),
        api_token: API_TOKEN.into(),
        request_timeout: Duration::from_secs(5),
    })
    .expect("failed to build collector");
    let collector_metrics = collector.metrics();
    tokio::spawn(collector.run(cancel.clone(), wake_rx));

    // Producer: three records published up front.
    let store = Arc::new(RecordStore::with_records(sample_records()));
    let endpoint = Endpoint::new(
        EndpointConfig {
            id: "producer-e2e".into(),
            address: "127.0.0.1".into(),
            port: producer_port,
            path: "/records".into(),
            tag: "record".into(),
        },
        store,
    );
    tokio::spawn(endpoint.run(cancel.clone()));

    let sink_base = format!("http://127.0.0.1:{}", sink_port);
    let producer_base = format!("http://127.0.0.1:{}", producer_port);

    // Wait until the HTTP listeners answer.
    let client = reqwest::Client::new();
    wait_for_ok(&client, &format!("{}/health", sink_base)).await;
    wait_for_ok(&client, &format!("{}/records", producer_base)).await;

    Pipeline {
        cancel,
        collector_metrics,
        sink_metrics,
        trigger_addr: format!("127.0.0.1:{}", trigger_port),
        sink_base,
    }
}

async fn wait_for_ok(client: &reqwest::Client, url: &str) {
    for _ in 0..100 {
        if let Ok(response) = client.get(url).send().await
            && response.status().is_success()
        {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("{} never became ready", url);
}

/// Send a trigger, retrying while the listener binds
async fn trigger_when_up(addr: &str, token: &str) {
    for _ in 0..100 {
        if send_trigger(addr, token).await.is_ok() {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("trigger listener at {} never came up", addr);
}

/// Poll until `check` passes or the deadline expires
async fn eventually(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..250 {
        if check() {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for: {}", what);
}

#[tokio::test]
async fn test_end_to_end_relay() {
    let pipeline = start_pipeline(53101, 53102, 53103).await;

    trigger_when_up(&pipeline.trigger_addr, TRIGGER_TOKEN).await;

    // One full cycle: pull, decode 3 records, submit, ack.
    let metrics = Arc::clone(&pipeline.collector_metrics);
    eventually("collector cycle to complete", || {
        metrics.snapshot().envelopes_submitted == 1
    })
    .await;

    let collector_snapshot = pipeline.collector_metrics.snapshot();
    assert_eq!(collector_snapshot.pulls_started, 1);
    assert_eq!(collector_snapshot.pulls_failed, 0);
    assert_eq!(collector_snapshot.records_relayed, 3);

    // The sink persisted exactly one entry whose byte count is the
    // serialized envelope size.
    let expected_bytes = Envelope::new(COLLECTOR_ID, sample_records()).to_bytes().len() as u64;
    let sink_metrics = Arc::clone(&pipeline.sink_metrics);
    eventually("sink to persist the envelope", || {
        sink_metrics.snapshot().entries_persisted == 1
    })
    .await;
    assert_eq!(pipeline.sink_metrics.snapshot().bytes_persisted, expected_bytes);

    pipeline.cancel.cancel();
}

#[tokio::test]
async fn test_sink_auth_matrix_over_the_wire() {
    let pipeline = start_pipeline(53111, 53112, 53113).await;
    let client = reqwest::Client::new();
    let log_url = format!("{}/log", pipeline.sink_base);

    // No Authorization header.
    let response = client.post(&log_url).body("x").send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // Well-formed but unregistered token.
    let response = client
        .post(&log_url)
        .bearer_auth("not_registered")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);

    // Registered token: accepted and acknowledged.
    let response = client
        .post(&log_url)
        .bearer_auth(API_TOKEN)
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["received_from"], COLLECTOR_ID);
    assert_eq!(json["bytes"], 7);

    // Health is unaffected by the failures above.
    let response = client
        .get(format!("{}/health", pipeline.sink_base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["time_utc"].is_string());

    pipeline.cancel.cancel();
}

#[tokio::test]
async fn test_non_matching_trigger_never_starts_a_pull() {
    let pipeline = start_pipeline(53121, 53122, 53123).await;

    trigger_when_up(&pipeline.trigger_addr, "NOT_THE_TOKEN").await;
    sleep(Duration::from_millis(300)).await;

    assert_eq!(pipeline.collector_metrics.snapshot().pulls_started, 0);

    // The right token still works afterwards.
    send_trigger(&pipeline.trigger_addr, TRIGGER_TOKEN)
        .await
        .unwrap();

    let metrics = Arc::clone(&pipeline.collector_metrics);
    eventually("collector cycle after the bad trigger", || {
        metrics.snapshot().envelopes_submitted == 1
    })
    .await;

    pipeline.cancel.cancel();
}

#[tokio::test]
async fn test_producer_404_for_unknown_path() {
    let pipeline = start_pipeline(53131, 53132, 53133).await;
    let client = reqwest::Client::new();

    let response = client
        .get("http://127.0.0.1:53131/transactions")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    pipeline.cancel.cancel();
}
