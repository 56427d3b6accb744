// crates/neura-client/src/config.rs
// ============================================================================
// Module: Neura Client Configuration
// Description: Configuration loading, environment fallback, and validation.
// Purpose: Resolve every client setting once, before the client is built.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration comes from three places, in order of precedence: values set
//! explicitly on [`ClientConfig`] (or in its TOML file), environment fallbacks
//! applied by [`ClientConfig::resolve_with`], and built-in defaults. The client
//! itself never reads the environment.
//! Security posture: config inputs are untrusted; files are size limited and
//! validation fails closed. API keys are redacted from `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::poller::PollConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service endpoint used when neither config nor environment names one.
pub const DEFAULT_ENDPOINT: &str = "https://control.neura-os.com";
/// Environment variable consulted for the API key when none is configured.
pub const API_KEY_ENV_VAR: &str = "NEURA_API_KEY";
/// Environment variable consulted for the endpoint when none is configured.
pub const ENDPOINT_ENV_VAR: &str = "NEURA_ENDPOINT";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "NEURA_CONFIG";
/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "neura.toml";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total config path length.
const MAX_CONFIG_PATH_LENGTH: usize = 4096;
/// Default response body limit in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Default total wait budget for decision polling, in milliseconds.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 30_000;
/// Default interval between decision polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Neura client configuration.
///
/// # Invariants
/// - `endpoint = None` resolves to [`DEFAULT_ENDPOINT`].
/// - `api_key = None` (or empty) sends requests without a bearer credential.
/// - `request_timeout_ms = None` leaves individual requests unbounded.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Service base URL.
    pub endpoint: Option<String>,
    /// Bearer credential.
    pub api_key: Option<String>,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// Default decision polling settings.
    pub poll: PollSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            user_agent: None,
            request_timeout_ms: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            poll: PollSettings::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("poll", &self.poll)
            .finish()
    }
}

/// Default wait settings used by callers that do not pass their own.
///
/// # Invariants
/// - `interval_ms` must be greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollSettings {
    /// Total wait budget in milliseconds.
    pub timeout_ms: u64,
    /// Fixed interval between polls in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollSettings {
    /// Converts the settings into a poll configuration.
    #[must_use]
    pub const fn to_poll_config(self) -> PollConfig {
        PollConfig::new(
            Duration::from_millis(self.timeout_ms),
            Duration::from_millis(self.interval_ms),
        )
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at the given endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the bearer credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, then [`CONFIG_ENV_VAR`], then
    /// `neura.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_file(&resolved)
    }

    /// Loads configuration like [`Self::load`], but falls back to defaults when
    /// no path was requested and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an existing or requested file is invalid.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        let requested = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        let resolved = resolve_path(path)?;
        if !requested && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&resolved)
    }

    /// Builds a configuration from defaults plus environment fallbacks.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().resolve_from_env()
    }

    /// Applies environment fallbacks from the process environment.
    #[must_use]
    pub fn resolve_from_env(self) -> Self {
        self.resolve_with(|key| env::var(key).ok())
    }

    /// Applies environment fallbacks through the supplied lookup.
    ///
    /// Explicitly configured values always win; empty environment values are
    /// ignored.
    #[must_use]
    pub fn resolve_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup_non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = lookup_non_empty(API_KEY_ENV_VAR);
        }
        if self.endpoint.is_none() {
            self.endpoint = lookup_non_empty(ENDPOINT_ENV_VAR);
        }
        self
    }

    /// Returns the endpoint without trailing slashes.
    #[must_use]
    pub fn normalized_endpoint(&self) -> String {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT).trim_end_matches('/').to_string()
    }

    /// Returns the bearer credential when one is configured and non-empty.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.normalized_endpoint();
        let url = Url::parse(&endpoint)
            .map_err(|err| ConfigError::Invalid(format!("endpoint is not a valid url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("endpoint must use http or https".to_string()));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("endpoint host required".to_string()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::Invalid("endpoint credentials are not allowed".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "endpoint must not carry a query or fragment".to_string(),
            ));
        }
        if let Some(key) = self.bearer_token()
            && key.chars().any(|ch| ch.is_whitespace() || ch.is_control())
        {
            return Err(ConfigError::Invalid(
                "api_key must not contain whitespace or control characters".to_string(),
            ));
        }
        if let Some(agent) = &self.user_agent
            && agent.trim().is_empty()
        {
            return Err(ConfigError::Invalid("user_agent must not be empty".to_string()));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads, parses, and validates a config file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_CONFIG_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}
