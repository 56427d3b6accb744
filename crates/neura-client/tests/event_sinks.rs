// crates/neura-client/tests/event_sinks.rs
// ============================================================================
// Module: Event Sink Tests
// Description: JSON-line output of the bundled event sinks.
// Purpose: Ensure events are appended as one parseable object per line.
// Dependencies: neura-client, tempfile, serde_json
// ============================================================================

//! ## Overview
//! Writes events through the bundled sinks and parses the resulting JSON lines.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::time::Duration;

use neura_client::ClientEventSink;
use neura_client::FileEventSink;
use neura_client::PollEvent;
use neura_client::PollStatus;
use neura_client::RequestEvent;
use neura_client::telemetry::RequestEventParams;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn file_sink_appends_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    let sink = FileEventSink::new(&path).unwrap();

    sink.record_request(&RequestEvent::new(RequestEventParams {
        method: "GET",
        path: "/decision/dec-1".to_string(),
        status: Some(200),
        error_kind: None,
        latency: Duration::from_millis(12),
        request_bytes: 0,
        response_bytes: 87,
    }));
    sink.record_poll(&PollEvent::new(
        "dec-1",
        3,
        None,
        PollStatus::Timeout,
        Duration::from_millis(1_500),
    ));
    drop(sink);

    let sink = FileEventSink::new(&path).unwrap();
    sink.record_poll(
        &PollEvent::new("dec-2", 1, None, PollStatus::Failed, Duration::ZERO)
            .with_error_kind("transport"),
    );

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "http_request");
    assert_eq!(lines[0]["outcome"], "ok");
    assert_eq!(lines[0]["status"], 200);
    assert_eq!(lines[1]["event"], "decision_poll");
    assert_eq!(lines[1]["status"], "timeout");
    assert_eq!(lines[1]["elapsed_ms"], 1_500);
    assert_eq!(lines[2]["error_kind"], "transport");
}
