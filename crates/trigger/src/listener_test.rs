//! Trigger listener tests
//!
//! These run against real localhost sockets on high ports unlikely to
//! conflict.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use super::{TriggerListener, TriggerListenerConfig};
use crate::send_trigger;

fn test_config(port: u16) -> TriggerListenerConfig {
    TriggerListenerConfig {
        id: "trigger-test".into(),
        address: "127.0.0.1".into(),
        port,
        token: "SUCCESS".into(),
        ..Default::default()
    }
}

/// Send a trigger, retrying while the listener task is still binding
async fn send_when_up(addr: &str, token: &str) {
    for _ in 0..50 {
        if send_trigger(addr, token).await.is_ok() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("listener at {} never came up", addr);
}

#[tokio::test]
async fn test_matching_token_wakes_exactly_once() {
    let port = 52801;
    let (listener, mut wake_rx) = TriggerListener::new(test_config(port));
    let metrics = listener.metrics();
    let cancel = CancellationToken::new();

    tokio::spawn(listener.run(cancel.clone()));
    let addr = format!("127.0.0.1:{}", port);

    send_when_up(&addr, "SUCCESS").await;

    timeout(Duration::from_secs(2), wake_rx.recv())
        .await
        .expect("wake should arrive")
        .expect("channel open");

    // Exactly one wake for one trigger.
    assert!(wake_rx.try_recv().is_err());
    assert_eq!(metrics.snapshot().signals_matched, 1);

    cancel.cancel();
}

#[tokio::test]
async fn test_non_matching_token_never_wakes() {
    let port = 52802;
    let (listener, mut wake_rx) = TriggerListener::new(test_config(port));
    let metrics = listener.metrics();
    let cancel = CancellationToken::new();

    tokio::spawn(listener.run(cancel.clone()));
    let addr = format!("127.0.0.1:{}", port);

    // Wrong payload, wrong case, empty payload: all dropped.
    send_when_up(&addr, "FAILURE").await;
    send_trigger(&addr, "success").await.unwrap();
    send_trigger(&addr, "").await.unwrap();

    assert!(
        timeout(Duration::from_millis(300), wake_rx.recv())
            .await
            .is_err(),
        "no wake expected for non-matching payloads"
    );

    // The listener keeps listening after rejects.
    send_trigger(&addr, "SUCCESS").await.unwrap();
    timeout(Duration::from_secs(2), wake_rx.recv())
        .await
        .expect("wake should arrive after rejects")
        .expect("channel open");

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.payloads_rejected, 3);
    assert_eq!(snapshot.signals_matched, 1);

    cancel.cancel();
}

#[tokio::test]
async fn test_trailing_newline_is_tolerated() {
    let port = 52803;
    let (listener, mut wake_rx) = TriggerListener::new(test_config(port));
    let cancel = CancellationToken::new();

    tokio::spawn(listener.run(cancel.clone()));
    let addr = format!("127.0.0.1:{}", port);

    send_when_up(&addr, "SUCCESS\n").await;

    timeout(Duration::from_secs(2), wake_rx.recv())
        .await
        .expect("wake should arrive")
        .expect("channel open");

    cancel.cancel();
}

#[tokio::test]
async fn test_wake_queue_overflow_drops_signals() {
    let port = 52804;
    let (listener, mut wake_rx) = TriggerListener::new(test_config(port));
    let metrics = listener.metrics();
    let cancel = CancellationToken::new();

    tokio::spawn(listener.run(cancel.clone()));
    let addr = format!("127.0.0.1:{}", port);

    // Nothing consumes the queue (depth 1), so extra signals drop.
    send_when_up(&addr, "SUCCESS").await;
    send_trigger(&addr, "SUCCESS").await.unwrap();
    send_trigger(&addr, "SUCCESS").await.unwrap();

    // Wait until all three payloads were seen.
    for _ in 0..50 {
        if metrics.snapshot().signals_matched == 3 {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.signals_matched, 3);
    assert_eq!(snapshot.signals_dropped, 2);

    // Only the queued signal is deliverable.
    timeout(Duration::from_secs(2), wake_rx.recv())
        .await
        .expect("queued wake")
        .expect("channel open");
    assert!(wake_rx.try_recv().is_err());

    cancel.cancel();
}

#[tokio::test]
async fn test_cancellation_stops_listener() {
    let port = 52805;
    let (listener, mut wake_rx) = TriggerListener::new(test_config(port));
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(listener.run(cancel.clone()));
    let addr = format!("127.0.0.1:{}", port);

    // Prove it is up before cancelling.
    send_when_up(&addr, "SUCCESS").await;
    timeout(Duration::from_secs(2), wake_rx.recv())
        .await
        .expect("wake should arrive")
        .expect("channel open");

    cancel.cancel();

    let result = timeout(Duration::from_secs(2), handle)
        .await
        .expect("listener should stop on cancel")
        .expect("task join");
    assert!(result.is_ok());
}
