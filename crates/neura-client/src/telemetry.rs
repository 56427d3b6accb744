// crates/neura-client/src/telemetry.rs
// ============================================================================
// Module: Neura Client Events
// Description: Structured request and poll events with pluggable sinks.
// Purpose: Emit JSON-line logs without tying the client to a logging stack.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every HTTP call produces a [`RequestEvent`] and every poll attempt a
//! [`PollEvent`]. Events are handed to a [`ClientEventSink`]; the default sink
//! discards them, and the bundled sinks write one JSON object per line to
//! stderr or an append-only file.
//! Security posture: events never carry credentials or request bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// HTTP request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Request succeeded and the body decoded.
    Ok,
    /// Request failed at any stage.
    Error,
}

/// Poll attempt classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    /// Fetched a non-terminal outcome; another attempt follows.
    Pending,
    /// Fetched a terminal outcome.
    Resolved,
    /// The wait budget ran out.
    Timeout,
    /// A fetch failed and aborted the wait.
    Failed,
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// HTTP request event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: &'static str,
    /// Request path relative to the endpoint.
    pub path: String,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Wall-clock latency in milliseconds.
    pub latency_ms: u128,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

/// Inputs required to construct a request event.
pub struct RequestEventParams {
    /// HTTP method.
    pub method: &'static str,
    /// Request path relative to the endpoint.
    pub path: String,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    /// Normalized error kind label; `None` marks success.
    pub error_kind: Option<&'static str>,
    /// Wall-clock latency.
    pub latency: Duration,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

impl RequestEvent {
    /// Creates a new request event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RequestEventParams) -> Self {
        let outcome =
            if params.error_kind.is_some() { RequestOutcome::Error } else { RequestOutcome::Ok };
        Self {
            event: "http_request",
            timestamp_ms: now_ms(),
            method: params.method,
            path: params.path,
            status: params.status,
            outcome,
            error_kind: params.error_kind,
            latency_ms: params.latency.as_millis(),
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
        }
    }
}

/// Decision poll event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PollEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Decision identifier being awaited.
    pub decision_id: String,
    /// Number of fetches performed so far.
    pub attempts: u32,
    /// Raw outcome from the latest fetch, when one succeeded.
    pub outcome: Option<String>,
    /// Attempt classification.
    pub status: PollStatus,
    /// Elapsed wait time in milliseconds.
    pub elapsed_ms: u128,
    /// Normalized error kind label for failed attempts.
    pub error_kind: Option<&'static str>,
}

impl PollEvent {
    /// Creates a new poll event with a consistent timestamp.
    #[must_use]
    pub fn new(
        decision_id: &str,
        attempts: u32,
        outcome: Option<&str>,
        status: PollStatus,
        elapsed: Duration,
    ) -> Self {
        Self {
            event: "decision_poll",
            timestamp_ms: now_ms(),
            decision_id: decision_id.to_string(),
            attempts,
            outcome: outcome.map(str::to_string),
            status,
            elapsed_ms: elapsed.as_millis(),
            error_kind: None,
        }
    }

    /// Attaches an error kind label.
    #[must_use]
    pub fn with_error_kind(mut self, kind: &'static str) -> Self {
        self.error_kind = Some(kind);
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for client events.
pub trait ClientEventSink: Send + Sync {
    /// Records an HTTP request event.
    fn record_request(&self, event: &RequestEvent);

    /// Records a decision poll event.
    fn record_poll(&self, _event: &PollEvent) {}
}

/// Sink that discards every event.
pub struct NoopEventSink;

impl ClientEventSink for NoopEventSink {
    fn record_request(&self, _event: &RequestEvent) {}
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl ClientEventSink for StderrEventSink {
    fn record_request(&self, event: &RequestEvent) {
        write_stderr_json(event);
    }

    fn record_poll(&self, event: &PollEvent) {
        write_stderr_json(event);
    }
}

/// Sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ClientEventSink for FileEventSink {
    fn record_request(&self, event: &RequestEvent) {
        self.append(event);
    }

    fn record_poll(&self, event: &PollEvent) {
        self.append(event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes one serialized event line to stderr.
fn write_stderr_json<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}
