// crates/neura-client/src/tests/support.rs
// ============================================================================
// Module: Client Unit Test Support
// Description: Deterministic clock, scripted decision source, and event capture.
// Purpose: Drive the poll loop without sleeping or touching the network.
// Dependencies: neura-client
// ============================================================================

//! ## Overview
//! [`FakeClock`] advances only when slept on, [`ScriptedSource`] replays a
//! queue of fetch results, and [`RecordingSink`] keeps emitted poll events.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use crate::error::ClientError;
use crate::poller::DecisionSource;
use crate::poller::PollClock;
use crate::telemetry::ClientEventSink;
use crate::telemetry::PollEvent;
use crate::telemetry::RequestEvent;
use crate::types::DecisionId;
use crate::types::DecisionResponse;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Clock whose time moves only through `sleep` or `advance`.
#[derive(Clone)]
pub struct FakeClock {
    /// Fixed origin instant.
    origin: Instant,
    /// Shared mutable state.
    state: Arc<Mutex<ClockState>>,
}

/// Mutable clock state.
#[derive(Default)]
struct ClockState {
    /// Time elapsed since `origin`.
    offset: Duration,
    /// Every requested sleep, in order.
    sleeps: Vec<Duration>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(ClockState::default())),
        }
    }

    /// Moves time forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        self.state.lock().unwrap().offset += by;
    }

    pub fn elapsed(&self) -> Duration {
        self.state.lock().unwrap().offset
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }
}

impl PollClock for FakeClock {
    fn now(&self) -> Instant {
        self.origin + self.state.lock().unwrap().offset
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.offset += duration;
        state.sleeps.push(duration);
    }
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Decision source replaying scripted results.
pub struct ScriptedSource {
    /// Clock used to stamp fetches.
    clock: FakeClock,
    /// Results returned in order.
    script: Mutex<VecDeque<Result<DecisionResponse, ClientError>>>,
    /// Outcome returned once the script is exhausted.
    fallback_outcome: String,
    /// Simulated latency added to the clock on each fetch.
    latency: Duration,
    /// Elapsed time at each fetch.
    fetch_times: Mutex<Vec<Duration>>,
}

impl ScriptedSource {
    pub fn new(clock: &FakeClock) -> Self {
        Self {
            clock: clock.clone(),
            script: Mutex::new(VecDeque::new()),
            fallback_outcome: "PENDING".to_string(),
            latency: Duration::ZERO,
            fetch_times: Mutex::new(Vec::new()),
        }
    }

    pub fn then_outcome(self, outcome: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(decision("dec-1", outcome)));
        self
    }

    pub fn then_error(self, err: ClientError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn otherwise(mut self, outcome: &str) -> Self {
        self.fallback_outcome = outcome.to_string();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetch_times.lock().unwrap().len()
    }

    pub fn fetch_times(&self) -> Vec<Duration> {
        self.fetch_times.lock().unwrap().clone()
    }
}

impl DecisionSource for ScriptedSource {
    fn fetch_decision(&self, id: &DecisionId) -> Result<DecisionResponse, ClientError> {
        self.fetch_times.lock().unwrap().push(self.clock.elapsed());
        self.clock.advance(self.latency);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(mut record)) => {
                record.id = id.clone();
                Ok(record)
            }
            Some(Err(err)) => Err(err),
            None => Ok(decision(id.as_str(), &self.fallback_outcome)),
        }
    }
}

/// Builds a decision record with the given outcome.
pub fn decision(id: &str, outcome: &str) -> DecisionResponse {
    DecisionResponse {
        id: DecisionId::new(id),
        outcome: outcome.to_string(),
        reason: format!("outcome {outcome}"),
        ..DecisionResponse::default()
    }
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Sink that keeps poll events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Captured poll events.
    pub polls: Mutex<Vec<PollEvent>>,
}

impl ClientEventSink for RecordingSink {
    fn record_request(&self, _event: &RequestEvent) {}

    fn record_poll(&self, event: &PollEvent) {
        self.polls.lock().unwrap().push(event.clone());
    }
}
