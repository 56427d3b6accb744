// crates/neura-client/src/types.rs
// ============================================================================
// Module: Neura Wire Types
// Description: Request and response records exchanged with the Neura service.
// Purpose: Provide serde-backed records with stable JSON field names.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Wire records mirror the service JSON contract. Optional fields are omitted
//! from requests when absent, and response records decode missing or `null`
//! fields to their empty defaults so partial server payloads remain readable.
//! Open-ended attribute, context, and metadata fields are carried as raw JSON
//! objects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Terminal outcome literal for an allowed decision.
pub const OUTCOME_ACT: &str = "ACT";
/// Terminal outcome literal for a refused decision.
pub const OUTCOME_DENY: &str = "DENY";

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Decision identifier issued by the service on submission.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied by this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    /// Creates a new decision identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DecisionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DecisionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Classified decision outcome.
///
/// # Invariants
/// - Classification is exact and case-sensitive; only `ACT` and `DENY` are
///   terminal. Every other string (including empty) is [`Self::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The decision allows the intent.
    Act,
    /// The decision refuses the intent.
    Deny,
    /// Evaluation has not reached a terminal verdict.
    Pending,
}

impl DecisionOutcome {
    /// Classifies a raw outcome string.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        match raw {
            OUTCOME_ACT => Self::Act,
            OUTCOME_DENY => Self::Deny,
            _ => Self::Pending,
        }
    }

    /// Returns true for `ACT` and `DENY`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Act | Self::Deny)
    }
}

// ============================================================================
// SECTION: Decision Requests
// ============================================================================

/// Actor requesting an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor type label (for example `agent` or `user`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Actor identifier.
    pub id: String,
    /// Free-form actor attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// Resource targeted by an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource identifier.
    pub id: String,
    /// Free-form resource attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// Decision submission payload, shared by `decide` and `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Intent the actor wants to perform.
    pub intent: String,
    /// Requesting actor.
    pub actor: Actor,
    /// Target resource.
    pub resource: Resource,
    /// Free-form evaluation context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    /// Caller correlation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

// ============================================================================
// SECTION: Decision Records
// ============================================================================

/// Decision record returned by submission and status fetches.
///
/// # Invariants
/// - `outcome` is the raw server string; use [`Self::outcome_kind`] to classify.
/// - Values are untrusted server output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionResponse {
    /// Decision identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: DecisionId,
    /// Raw outcome string.
    #[serde(deserialize_with = "null_as_default")]
    pub outcome: String,
    /// Decision class label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Decision evidence object, when issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<DecisionEvidence>,
    /// Human-readable reason.
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
    /// Policies that contributed to the decision.
    #[serde(deserialize_with = "null_as_default")]
    pub policies: Vec<String>,
    /// Decision timestamp (RFC 3339).
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// Audit log reference.
    #[serde(deserialize_with = "null_as_default")]
    pub audit_ref: String,
    /// Free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl DecisionResponse {
    /// Classifies the raw outcome.
    #[must_use]
    pub fn outcome_kind(&self) -> DecisionOutcome {
        DecisionOutcome::classify(&self.outcome)
    }

    /// Returns true when the outcome is `ACT` or `DENY`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome_kind().is_terminal()
    }

    /// Parses the decision timestamp, returning `None` when it is not RFC 3339.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Evidence envelope attached to a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvidence {
    /// Decision evidence object.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deo: DecisionEvidenceObject,
}

/// Decision evidence object describing how a verdict was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionEvidenceObject {
    /// Decision identifier the evidence belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub decision_id: String,
    /// Evidence timestamp (RFC 3339).
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// Actor label.
    #[serde(deserialize_with = "null_as_default")]
    pub actor: String,
    /// Policy that allowed the intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_by_policy: Option<String>,
    /// Hash of the evaluated policy set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_hash: Option<String>,
    /// Memory snapshot reference used during evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_snapshot_ref: Option<String>,
    /// Risk score assigned by the evaluator.
    #[serde(deserialize_with = "null_as_default")]
    pub risk_score: f64,
    /// Tool permissions granted with the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_permissions: Option<Vec<String>>,
    /// Evaluator confidence.
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
    /// True when the verdict was manually overridden.
    #[serde(rename = "override", deserialize_with = "null_as_default")]
    pub overridden: bool,
}

/// Dry-run validation result for a decision request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResponse {
    /// True when the request is well formed.
    #[serde(deserialize_with = "null_as_default")]
    pub valid: bool,
    /// Outcome the service expects to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_outcome: Option<String>,
    /// Validation error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Memory Records
// ============================================================================

/// Memory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    /// Event-like memory tied to a moment.
    Episodic,
    /// Fact-like memory.
    Semantic,
}

/// Memory storage payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRequest {
    /// Memory content.
    pub content: String,
    /// Memory category.
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Identity owning the memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
}

/// Memory search payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySearchRequest {
    /// Search query.
    pub query: String,
    /// Maximum number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Identity scope for the search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
}

/// Stored memory record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryResponse {
    /// Memory identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Memory content.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Storage timestamp (RFC 3339).
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
}

impl MemoryResponse {
    /// Parses the storage timestamp, returning `None` when it is not RFC 3339.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

// ============================================================================
// SECTION: Auth Records
// ============================================================================

/// Credential registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Organization identifier.
    pub org_id: String,
    /// Credential display name.
    pub name: String,
    /// Requested permissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Issued credential.
///
/// # Invariants
/// - `api_key` and `secret` are redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    /// Issued API key.
    #[serde(deserialize_with = "null_as_default")]
    pub api_key: String,
    /// Issued secret.
    #[serde(deserialize_with = "null_as_default")]
    pub secret: String,
    /// Expiry timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Service message.
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

impl AuthResponse {
    /// Parses the expiry timestamp when present and valid.
    #[must_use]
    pub fn parsed_expires_at(&self) -> Option<OffsetDateTime> {
        self.expires_at.as_deref().and_then(parse_timestamp)
    }
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("api_key", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("message", &self.message)
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes `null` as the type's default value.
///
/// Used with `#[serde(default)]` so absent and `null` fields read the same.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parses an RFC 3339 timestamp.
fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}
