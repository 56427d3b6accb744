// crates/neura-client/src/error.rs
// ============================================================================
// Module: Neura Client Errors
// Description: Error taxonomy for client construction, transport, and polling.
// Purpose: Give callers stable variants to branch on without string matching.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] covers every failure the client can surface. Fetch failures
//! (transport, status, decode, size limit) are never retried by the client and
//! reach the caller unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Neura client errors.
///
/// # Invariants
/// - Variants are stable for caller error mapping and tests.
/// - `Status::body` is untrusted server text, reproduced verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("neura client config error: {0}")]
    Config(String),
    /// Caller supplied an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Request payload could not be serialized.
    #[error("neura request encode error: {0}")]
    Encode(String),
    /// Connection or I/O failure while talking to the service.
    #[error("neura transport error: {0}")]
    Transport(String),
    /// Service answered with a non-success status.
    #[error("api request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the service.
        body: String,
    },
    /// Response body could not be decoded.
    #[error("neura response decode error: {0}")]
    Decode(String),
    /// Response body exceeds the configured limit.
    #[error("neura response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Observed size in bytes (advertised or read).
        actual: u64,
        /// Maximum size in bytes.
        limit: usize,
    },
    /// No terminal outcome was observed before the wait budget ran out.
    #[error("timeout waiting for decision {decision_id}")]
    Timeout {
        /// Identifier of the decision being awaited.
        decision_id: String,
    },
}

impl ClientError {
    /// Returns true for failures raised while fetching from the service.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_) | Self::ResponseTooLarge { .. }
        )
    }

    /// Returns true when a decision wait ran out of time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns a stable label for telemetry.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Encode(_) => "encode",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::ResponseTooLarge { .. } => "response_too_large",
            Self::Timeout { .. } => "timeout",
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
