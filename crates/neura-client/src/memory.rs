// crates/neura-client/src/memory.rs
// ============================================================================
// Module: Memory Service
// Description: Memory storage and search operations.
// Purpose: Store agent memories and query them by text.
// Dependencies: crate::client
// ============================================================================

//! ## Overview
//! Thin wrappers over the shared request helper for the `/v1/memory` routes.
//! A `null` search result reads as no matches.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::client::NeuraClient;
use crate::error::ClientError;
use crate::types::MemoryRequest;
use crate::types::MemoryResponse;
use crate::types::MemorySearchRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Memory storage path.
const MEMORY_PATH: &str = "/v1/memory";
/// Memory search path.
const MEMORY_SEARCH_PATH: &str = "/v1/memory/search";

// ============================================================================
// SECTION: Service
// ============================================================================

/// Memory operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct MemoryService<'a> {
    /// Owning client.
    client: &'a NeuraClient,
}

impl<'a> MemoryService<'a> {
    /// Binds the service to `client`.
    pub(crate) const fn new(client: &'a NeuraClient) -> Self {
        Self {
            client,
        }
    }

    /// Stores a memory.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on encode, transport, status, or decode failure.
    pub fn store(&self, request: &MemoryRequest) -> Result<MemoryResponse, ClientError> {
        self.client.post_json(MEMORY_PATH, request)
    }

    /// Searches stored memories.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on encode, transport, status, or decode failure.
    pub fn search(&self, request: &MemorySearchRequest) -> Result<Vec<MemoryResponse>, ClientError> {
        let found: Option<Vec<MemoryResponse>> =
            self.client.post_json(MEMORY_SEARCH_PATH, request)?;
        Ok(found.unwrap_or_default())
    }
}
