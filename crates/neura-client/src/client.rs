// crates/neura-client/src/client.rs
// ============================================================================
// Module: Neura Client
// Description: Shared request helper and decision operations.
// Purpose: Send typed JSON requests to the Neura service and decode replies.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`NeuraClient`] owns one blocking HTTP client and funnels every operation
//! through a single request helper:
//! - JSON request bodies, `Content-Type: application/json`, and a fixed user
//!   agent on every call.
//! - `Authorization: Bearer` only when an API key is configured, so the
//!   registration flow works without credentials.
//! - Non-success statuses surface as [`ClientError::Status`] with the body
//!   reproduced verbatim; success bodies are size limited and decoded.
//!
//! Security posture: responses are untrusted and read with a hard byte limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::memory::MemoryService;
use crate::poller::DecisionPoller;
use crate::poller::DecisionSource;
use crate::poller::PollConfig;
use crate::telemetry::ClientEventSink;
use crate::telemetry::NoopEventSink;
use crate::telemetry::RequestEvent;
use crate::telemetry::RequestEventParams;
use crate::types::DecisionId;
use crate::types::DecisionRequest;
use crate::types::DecisionResponse;
use crate::types::ValidationResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("neura-sdk-rust/", env!("CARGO_PKG_VERSION"));
/// Decision submission path.
const DECIDE_PATH: &str = "/v1/decide";
/// Decision validation path.
const VALIDATE_PATH: &str = "/v1/validate";
/// Decision status path prefix; the identifier is appended as one segment.
const DECISION_PATH: &str = "/decision";

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the Neura service.
///
/// # Invariants
/// - `endpoint` has no trailing slash and parsed as an http(s) URL.
/// - `bearer_token` is `None` or non-empty.
pub struct NeuraClient {
    /// Normalized service base URL.
    endpoint: String,
    /// Optional bearer credential.
    bearer_token: Option<String>,
    /// Maximum accepted response size in bytes.
    max_response_bytes: usize,
    /// Default wait budget from configuration.
    poll: PollConfig,
    /// Underlying HTTP client.
    http: Client,
    /// Sink for request and poll events.
    sink: Arc<dyn ClientEventSink>,
}

impl fmt::Debug for NeuraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuraClient")
            .field("endpoint", &self.endpoint)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("max_response_bytes", &self.max_response_bytes)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl NeuraClient {
    /// Builds a client from a resolved configuration.
    ///
    /// The configuration is used as given; apply environment fallbacks with
    /// [`ClientConfig::resolve_from_env`] beforehand if wanted.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when validation fails or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let user_agent = config.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| ClientError::Config(format!("http client build failed: {err}")))?;
        Ok(Self {
            endpoint: config.normalized_endpoint(),
            bearer_token: config.bearer_token().map(str::to_string),
            max_response_bytes: config.max_response_bytes,
            poll: config.poll.to_poll_config(),
            http,
            sink: Arc::new(NoopEventSink),
        })
    }

    /// Routes request and poll events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn ClientEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the normalized endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns true when requests carry a bearer credential.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Returns the configured default wait budget.
    #[must_use]
    pub const fn default_poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Returns the memory service handle.
    #[must_use]
    pub const fn memory(&self) -> MemoryService<'_> {
        MemoryService::new(self)
    }

    /// Returns the auth service handle.
    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    // ------------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------------

    /// Submits a decision request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on encode, transport, status, or decode failure.
    pub fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, ClientError> {
        self.post_json(DECIDE_PATH, request)
    }

    /// Dry-runs a decision request without recording a decision.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on encode, transport, status, or decode failure.
    pub fn validate(&self, request: &DecisionRequest) -> Result<ValidationResponse, ClientError> {
        self.post_json(VALIDATE_PATH, request)
    }

    /// Fetches the current record for a decision.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub fn get_decision(&self, id: &DecisionId) -> Result<DecisionResponse, ClientError> {
        let mut url = self.url(DECISION_PATH)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Config("endpoint cannot carry path segments".to_string()))?
            .push(id.as_str());
        self.send(Method::GET, url, None)
    }

    /// Polls a decision until it is `ACT` or `DENY`, or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] when the budget runs out, the first
    /// fetch error unchanged, or [`ClientError::InvalidArgument`] for an empty
    /// identifier or zero interval.
    pub fn wait_for_decision(
        &self,
        id: &DecisionId,
        timeout: Duration,
        interval: Duration,
    ) -> Result<DecisionResponse, ClientError> {
        self.wait_for_decision_with(id, PollConfig::new(timeout, interval))
    }

    /// Polls a decision using an explicit poll configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::wait_for_decision`].
    pub fn wait_for_decision_with(
        &self,
        id: &DecisionId,
        config: PollConfig,
    ) -> Result<DecisionResponse, ClientError> {
        DecisionPoller::new(config).with_event_sink(Arc::clone(&self.sink)).wait(self, id)
    }

    /// Submits a decision and, when the reply is not terminal, waits for it.
    ///
    /// # Errors
    ///
    /// Returns the submission error, or any error from
    /// [`Self::wait_for_decision_with`].
    pub fn decide_and_wait(
        &self,
        request: &DecisionRequest,
        config: PollConfig,
    ) -> Result<DecisionResponse, ClientError> {
        let submitted = self.decide(request)?;
        if submitted.is_terminal() {
            return Ok(submitted);
        }
        self.wait_for_decision_with(&submitted.id, config)
    }

    // ------------------------------------------------------------------------
    // Request helper
    // ------------------------------------------------------------------------

    /// Sends a JSON `POST` and decodes the reply.
    pub(crate) fn post_json<P, T>(&self, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(payload).map_err(|err| ClientError::Encode(err.to_string()))?;
        let url = self.url(path)?;
        self.send(Method::POST, url, Some(body))
    }

    /// Joins `path` onto the endpoint.
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{path}", self.endpoint))
            .map_err(|err| ClientError::Config(format!("invalid request url: {err}")))
    }

    /// Sends one request, records its event, and decodes the reply.
    fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        let started = Instant::now();
        let path = url.path().to_string();
        let request_bytes = body.as_ref().map_or(0, Vec::len);
        let mut trace = ExchangeTrace::default();
        let result = self.exchange(&method, url, body, &mut trace);
        self.sink.record_request(&RequestEvent::new(RequestEventParams {
            method: method_label(&method),
            path,
            status: trace.status,
            error_kind: result.as_ref().err().map(ClientError::kind),
            latency: started.elapsed(),
            request_bytes,
            response_bytes: trace.response_bytes,
        }));
        result
    }

    /// Performs the HTTP exchange.
    fn exchange<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: Url,
        body: Option<Vec<u8>>,
        trace: &mut ExchangeTrace,
    ) -> Result<T, ClientError> {
        let mut request =
            self.http.request(method.clone(), url).header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        let mut response = request.send().map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        trace.status = Some(status.as_u16());
        if !status.is_success() {
            let body = read_response_truncated(&mut response, self.max_response_bytes);
            trace.response_bytes = body.len();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        let body = read_response_limited(&mut response, self.max_response_bytes)?;
        trace.response_bytes = body.len();
        serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

impl DecisionSource for NeuraClient {
    fn fetch_decision(&self, id: &DecisionId) -> Result<DecisionResponse, ClientError> {
        self.get_decision(id)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Status and size observed during one exchange.
#[derive(Default)]
struct ExchangeTrace {
    /// HTTP status, once a response arrived.
    status: Option<u16>,
    /// Bytes read from the response body.
    response_bytes: usize,
}

/// Returns a static label for the HTTP methods the client uses.
fn method_label(method: &Method) -> &'static str {
    if *method == Method::GET {
        "GET"
    } else if *method == Method::POST {
        "POST"
    } else {
        "OTHER"
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, ClientError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ClientError::Config("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(ClientError::ResponseTooLarge {
            actual: expected,
            limit: max_bytes,
        });
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| ClientError::Transport(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ClientError::ResponseTooLarge {
            actual: u64::try_from(buf.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(buf)
}

/// Reads at most `max_bytes` of an error body, dropping the rest.
///
/// A body that cannot be read yields an empty buffer.
fn read_response_truncated(response: &mut Response, max_bytes: usize) -> Vec<u8> {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    let mut buf = Vec::new();
    if response.take(limit).read_to_end(&mut buf).is_err() {
        buf.clear();
    }
    buf
}
