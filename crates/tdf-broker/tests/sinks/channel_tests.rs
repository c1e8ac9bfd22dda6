// crates/tdf-broker/tests/sinks/channel_tests.rs
// ============================================================================
// Module: ChannelSink Unit Tests
// Description: Tests for the tokio channel sink.
// Purpose: Validate message forwarding and full or closed channel handling.
// Dependencies: tdf-broker, tokio
// ============================================================================

//! ## Overview
//! Exercises [`tdf_broker::ChannelSink`] delivery semantics.

use tdf_broker::ChannelSink;
use tdf_broker::Sink;
use tdf_broker::SinkError;
use tokio::sync::mpsc;

use super::common::sample_notice;
use super::common::sample_notice_for;

/// Verifies the notice and receipt are forwarded together.
#[test]
fn channel_sink_forwards_message() {
    let (tx, mut rx) = mpsc::channel(4);
    let sink = ChannelSink::new(tx);

    let notice = sample_notice();
    let receipt = sink.deliver(&notice).expect("deliver");
    assert_eq!(receipt.receipt_id, "channel-1");

    let message = rx.try_recv().expect("message queued");
    assert_eq!(message.notice, notice);
    assert_eq!(message.receipt, receipt);
}

/// Verifies a full channel fails delivery instead of blocking.
#[test]
fn channel_sink_fails_when_full() {
    let (tx, _rx) = mpsc::channel(1);
    let sink = ChannelSink::with_publisher(tx, "dashboard");

    sink.deliver(&sample_notice_for("a", "1")).expect("first fits");
    let err = sink.deliver(&sample_notice_for("b", "2")).expect_err("second is full");
    assert!(matches!(err, SinkError::DeliveryFailed(ref reason) if reason == "channel full"));
}

/// Verifies a dropped receiver fails delivery.
#[test]
fn channel_sink_fails_when_closed() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let sink = ChannelSink::new(tx);

    let err = sink.deliver(&sample_notice()).expect_err("closed");
    assert!(matches!(err, SinkError::DeliveryFailed(ref reason) if reason == "channel closed"));
}

/// Verifies messages can be consumed by an async task.
#[tokio::test]
async fn channel_sink_feeds_async_consumer() {
    let (tx, mut rx) = mpsc::channel(8);
    let sink = ChannelSink::new(tx);
    for index in 1 ..= 3 {
        sink.deliver(&sample_notice_for("t", &index.to_string())).expect("deliver");
    }
    drop(sink);

    let mut ids = Vec::new();
    while let Some(message) = rx.recv().await {
        ids.push(message.notice.result_id.as_str().to_string());
    }
    assert_eq!(ids, vec!["1", "2", "3"]);
}
