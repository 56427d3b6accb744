// crates/neura-client/src/auth.rs
// ============================================================================
// Module: Auth Service
// Description: Credential registration.
// Purpose: Issue API keys for an organization.
// Dependencies: crate::client
// ============================================================================

//! ## Overview
//! Registration is the bootstrap flow: it is allowed on a client without an
//! API key, in which case no `Authorization` header is sent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::client::NeuraClient;
use crate::error::ClientError;
use crate::types::AuthRequest;
use crate::types::AuthResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Credential registration path.
const REGISTER_PATH: &str = "/v1/auth/register";

// ============================================================================
// SECTION: Service
// ============================================================================

/// Auth operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    /// Owning client.
    client: &'a NeuraClient,
}

impl<'a> AuthService<'a> {
    /// Binds the service to `client`.
    pub(crate) const fn new(client: &'a NeuraClient) -> Self {
        Self {
            client,
        }
    }

    /// Registers a new credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on encode, transport, status, or decode failure.
    pub fn register(&self, request: &AuthRequest) -> Result<AuthResponse, ClientError> {
        self.client.post_json(REGISTER_PATH, request)
    }
}
