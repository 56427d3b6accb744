// crates/neura-client/src/poller.rs
// ============================================================================
// Module: Decision Poller
// Description: Fixed-interval status polling for asynchronous decisions.
// Purpose: Resolve a pending decision to ACT or DENY within a time budget.
// Dependencies: crate::types, crate::telemetry
// ============================================================================

//! ## Overview
//! [`DecisionPoller`] fetches a decision by identifier until its outcome is
//! terminal or the wait budget is spent. The loop is blocking and carries no
//! state between calls:
//!
//! 1. While elapsed time is below the timeout, fetch the record.
//! 2. Return it if the outcome is `ACT` or `DENY`.
//! 3. Otherwise sleep for exactly one interval and repeat.
//!
//! There is no backoff, no jitter, and no attempt cap. A fetch error ends the
//! wait immediately. Once elapsed time reaches the timeout no further fetch is
//! attempted and the wait fails with [`ClientError::Timeout`]. A slow fetch or
//! the final sleep can overrun the nominal budget; sleeps are not interrupted.
//!
//! Fetching and timekeeping sit behind [`DecisionSource`] and [`PollClock`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crate::error::ClientError;
use crate::telemetry::ClientEventSink;
use crate::telemetry::NoopEventSink;
use crate::telemetry::PollEvent;
use crate::telemetry::PollStatus;
use crate::types::DecisionId;
use crate::types::DecisionResponse;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Wait budget for a decision poll.
///
/// # Invariants
/// - `interval` must be non-zero when the poller runs; a zero interval is
///   rejected with [`ClientError::InvalidArgument`].
/// - A zero `timeout` fails immediately without fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total wall-clock budget.
    pub timeout: Duration,
    /// Fixed sleep between attempts.
    pub interval: Duration,
}

impl PollConfig {
    /// Creates a poll configuration.
    #[must_use]
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
        }
    }

    /// Creates a poll configuration from signed millisecond values.
    ///
    /// Negative timeouts clamp to zero; negative intervals clamp to zero and
    /// are then rejected when the poller runs.
    #[must_use]
    pub fn from_millis(timeout_ms: i64, interval_ms: i64) -> Self {
        Self::new(
            Duration::from_millis(timeout_ms.max(0).unsigned_abs()),
            Duration::from_millis(interval_ms.max(0).unsigned_abs()),
        )
    }
}

// ============================================================================
// SECTION: Seams
// ============================================================================

/// Source of decision records.
pub trait DecisionSource {
    /// Fetches the current record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the record cannot be fetched.
    fn fetch_decision(&self, id: &DecisionId) -> Result<DecisionResponse, ClientError>;
}

/// Monotonic clock and sleeper used by the poll loop.
pub trait PollClock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Clock backed by [`Instant::now`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl PollClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ============================================================================
// SECTION: Poller
// ============================================================================

/// Fixed-interval decision poller.
pub struct DecisionPoller<C = SystemClock> {
    /// Wait budget.
    config: PollConfig,
    /// Clock used for elapsed time and sleeps.
    clock: C,
    /// Sink for per-attempt events.
    sink: Arc<dyn ClientEventSink>,
}

impl DecisionPoller<SystemClock> {
    /// Creates a poller driven by the system clock.
    #[must_use]
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: PollClock> DecisionPoller<C> {
    /// Creates a poller driven by the supplied clock.
    #[must_use]
    pub fn with_clock(config: PollConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            sink: Arc::new(NoopEventSink),
        }
    }

    /// Routes poll events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn ClientEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the configured wait budget.
    #[must_use]
    pub const fn config(&self) -> PollConfig {
        self.config
    }

    /// Waits for `id` to reach a terminal outcome.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidArgument`] for an empty identifier or zero
    ///   interval, before any fetch.
    /// - The first fetch error, unchanged.
    /// - [`ClientError::Timeout`] when the budget runs out.
    pub fn wait<S>(&self, source: &S, id: &DecisionId) -> Result<DecisionResponse, ClientError>
    where
        S: DecisionSource + ?Sized,
    {
        if id.is_empty() {
            return Err(ClientError::InvalidArgument("decision id must not be empty".to_string()));
        }
        if self.config.interval.is_zero() {
            return Err(ClientError::InvalidArgument(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        let start = self.clock.now();
        let mut attempts: u32 = 0;
        loop {
            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.config.timeout {
                self.sink.record_poll(&PollEvent::new(
                    id.as_str(),
                    attempts,
                    None,
                    PollStatus::Timeout,
                    elapsed,
                ));
                return Err(ClientError::Timeout {
                    decision_id: id.to_string(),
                });
            }

            attempts = attempts.saturating_add(1);
            let decision = match source.fetch_decision(id) {
                Ok(decision) => decision,
                Err(err) => {
                    let elapsed = self.clock.now().saturating_duration_since(start);
                    self.sink.record_poll(
                        &PollEvent::new(id.as_str(), attempts, None, PollStatus::Failed, elapsed)
                            .with_error_kind(err.kind()),
                    );
                    return Err(err);
                }
            };

            let elapsed = self.clock.now().saturating_duration_since(start);
            if decision.is_terminal() {
                self.sink.record_poll(&PollEvent::new(
                    id.as_str(),
                    attempts,
                    Some(&decision.outcome),
                    PollStatus::Resolved,
                    elapsed,
                ));
                return Ok(decision);
            }
            self.sink.record_poll(&PollEvent::new(
                id.as_str(),
                attempts,
                Some(&decision.outcome),
                PollStatus::Pending,
                elapsed,
            ));
            self.clock.sleep(self.config.interval);
        }
    }
}
