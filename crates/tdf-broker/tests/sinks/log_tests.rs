// crates/tdf-broker/tests/sinks/log_tests.rs
// ============================================================================
// Module: LogSink Unit Tests
// Description: Tests for the JSON-line log sink.
// Purpose: Validate LogSink receipts, record layout, and write failures.
// Dependencies: tdf-broker, serde_json
// ============================================================================

//! ## Overview
//! Exercises [`tdf_broker::LogSink`] behavior and JSON log output.

use serde_json::Value;
use tdf_broker::LogSink;
use tdf_broker::Sink;
use tdf_broker::SinkError;

use super::common::FailingWriter;
use super::common::SharedBuffer;
use super::common::sample_notice;
use super::common::sample_notice_for;

// ============================================================================
// SECTION: Constructor Tests
// ============================================================================

/// Verifies the default publisher name is `log`.
#[test]
fn log_sink_new_uses_log_publisher() {
    let sink = LogSink::new(SharedBuffer::new());
    let receipt = sink.deliver(&sample_notice()).expect("deliver");
    assert_eq!(receipt.receipt_id, "log-1");
    assert_eq!(receipt.publisher, "log");
}

/// Verifies a custom publisher name prefixes receipts.
#[test]
fn log_sink_with_publisher_uses_custom_name() {
    let sink = LogSink::with_publisher(SharedBuffer::new(), "audit-log");
    let receipt = sink.deliver(&sample_notice()).expect("deliver");
    assert_eq!(receipt.receipt_id, "audit-log-1");
    assert_eq!(receipt.publisher, "audit-log");
}

// ============================================================================
// SECTION: Record Tests
// ============================================================================

/// Verifies one JSON line is written per notice with the expected fields.
#[test]
fn log_sink_writes_one_json_line_per_notice() {
    let buffer = SharedBuffer::new();
    let sink = LogSink::new(buffer.clone());

    sink.deliver(&sample_notice_for("first", "1")).expect("first");
    sink.deliver(&sample_notice_for("second", "2")).expect("second");

    let output = buffer.to_string_lossy();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: Value = serde_json::from_str(lines[0]).expect("json line");
    assert_eq!(first["receipt_id"], "log-1");
    assert_eq!(first["publisher"], "log");
    assert_eq!(first["channel"], "results");
    assert_eq!(first["result_id"], "1");
    assert_eq!(first["test_name"], "first");

    let second: Value = serde_json::from_str(lines[1]).expect("json line");
    assert_eq!(second["receipt_id"], "log-2");
    assert_eq!(second["test_name"], "second");
}

// ============================================================================
// SECTION: Error Tests
// ============================================================================

/// Verifies writer failures surface as log write errors.
#[test]
fn log_sink_reports_write_failure() {
    let sink = LogSink::new(FailingWriter);
    let err = sink.deliver(&sample_notice()).expect_err("write should fail");
    assert!(matches!(err, SinkError::LogWriteFailed(_)));
    assert!(err.to_string().contains("simulated write failure"));
}
