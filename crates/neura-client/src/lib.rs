// crates/neura-client/src/lib.rs
// ============================================================================
// Module: Neura Client
// Description: Blocking HTTP+JSON client for the Neura decision service.
// Purpose: Expose decision, memory, and auth endpoints behind typed records.
// Dependencies: reqwest, serde, serde_json, thiserror, time, toml, url
// ============================================================================

//! ## Overview
//! This crate wraps the Neura decision service in a small blocking client.
//! Every operation funnels through one shared request helper that sets the
//! bearer credential, enforces a response size limit, and maps non-success
//! statuses to [`ClientError::Status`]. Asynchronously evaluated decisions are
//! resolved by [`DecisionPoller`], a fixed-interval poll loop bounded by a
//! wall-clock timeout.
//! Invariants:
//! - Configuration (including environment fallbacks) is resolved once, in
//!   [`ClientConfig`], before a [`NeuraClient`] exists.
//! - Only `ACT` and `DENY` are terminal outcomes.
//!
//! Security posture: server responses are untrusted; bodies are size limited
//! and credentials never appear in `Debug` output or emitted events.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod poller;
pub mod telemetry;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthService;
pub use client::NeuraClient;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use config::DEFAULT_ENDPOINT;
pub use config::PollSettings;
pub use error::ClientError;
pub use memory::MemoryService;
pub use poller::DecisionPoller;
pub use poller::DecisionSource;
pub use poller::PollClock;
pub use poller::PollConfig;
pub use poller::SystemClock;
pub use telemetry::ClientEventSink;
pub use telemetry::FileEventSink;
pub use telemetry::NoopEventSink;
pub use telemetry::PollEvent;
pub use telemetry::PollStatus;
pub use telemetry::RequestEvent;
pub use telemetry::RequestOutcome;
pub use telemetry::StderrEventSink;
pub use types::Actor;
pub use types::AuthRequest;
pub use types::AuthResponse;
pub use types::DecisionEvidence;
pub use types::DecisionEvidenceObject;
pub use types::DecisionId;
pub use types::DecisionOutcome;
pub use types::DecisionRequest;
pub use types::DecisionResponse;
pub use types::MemoryKind;
pub use types::MemoryRequest;
pub use types::MemoryResponse;
pub use types::MemorySearchRequest;
pub use types::Resource;
pub use types::ValidationResponse;

#[cfg(test)]
mod tests;
