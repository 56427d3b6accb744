// crates/neura-client/tests/common/mod.rs
// ============================================================================
// Module: Client Integration Test Support
// Description: Scripted local HTTP server and event capture for client tests.
// Purpose: Observe exactly what the client sends and control what it receives.
// Dependencies: tiny_http, neura-client
// ============================================================================

//! ## Overview
//! [`ScriptedServer`] answers requests in order from a fixed list of canned
//! responses and records every request it sees.

#![allow(dead_code, reason = "Helpers are shared across several test binaries.")]

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use neura_client::ClientConfig;
use neura_client::ClientEventSink;
use neura_client::NeuraClient;
use neura_client::PollEvent;
use neura_client::RequestEvent;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Request observed by the scripted server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// HTTP method.
    pub method: String,
    /// Raw request target (path and query).
    pub url: String,
    /// Headers with lowercase names.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: String,
}

impl CapturedRequest {
    /// Returns the first header value with the given lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Builds a 200 JSON response.
pub fn ok_json(value: &serde_json::Value) -> CannedResponse {
    CannedResponse {
        status: 200,
        body: value.to_string(),
    }
}

/// Builds a response with an arbitrary status and raw body.
pub fn raw(status: u16, body: &str) -> CannedResponse {
    CannedResponse {
        status,
        body: body.to_string(),
    }
}

/// Local server answering from a script.
pub struct ScriptedServer {
    /// Base URL, e.g. `http://127.0.0.1:1234`.
    pub url: String,
    /// Requests seen so far.
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    /// Serving thread.
    handle: Option<thread::JoinHandle<()>>,
}

impl ScriptedServer {
    /// Starts a server that answers `responses` in order, then stops.
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let handle = thread::spawn(move || {
            for canned in responses {
                let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(5)) else {
                    return;
                };
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let headers = request
                    .headers()
                    .iter()
                    .map(|header| {
                        (
                            header.field.as_str().as_str().to_ascii_lowercase(),
                            header.value.as_str().to_string(),
                        )
                    })
                    .collect();
                sink.lock().unwrap().push(CapturedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers,
                    body,
                });
                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });
        Self {
            url: format!("http://{addr}"),
            captured,
            handle: Some(handle),
        }
    }

    /// Waits for the server thread and returns every captured request.
    pub fn finish(mut self) -> Vec<CapturedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.captured.lock().unwrap().clone()
    }
}

// ============================================================================
// SECTION: Client Helpers
// ============================================================================

/// Builds a client for `endpoint` with an optional API key.
pub fn client_for(endpoint: &str, api_key: Option<&str>) -> NeuraClient {
    let mut config = ClientConfig::default().with_endpoint(endpoint);
    config.api_key = api_key.map(str::to_string);
    NeuraClient::new(config).unwrap()
}

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Captured request events.
    pub requests: Mutex<Vec<RequestEvent>>,
    /// Captured poll events.
    pub polls: Mutex<Vec<PollEvent>>,
}

impl ClientEventSink for RecordingSink {
    fn record_request(&self, event: &RequestEvent) {
        self.requests.lock().unwrap().push(event.clone());
    }

    fn record_poll(&self, event: &PollEvent) {
        self.polls.lock().unwrap().push(event.clone());
    }
}
