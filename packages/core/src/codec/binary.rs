//! Binary Content Resolver Boundary
//!
//! Binary property values are opaque handles; the bytes live in an
//! external binary store. This module defines the consumed boundary for
//! resolving a handle to its content. The codec itself never calls it -
//! resolution happens above this core, when a caller actually needs the
//! bytes.

use crate::models::BinaryHandle;
use async_trait::async_trait;
use thiserror::Error;

/// Binary resolution errors
#[derive(Error, Debug)]
pub enum BinaryError {
    /// No content is stored for the handle
    #[error("Binary content not found for handle '{0}'")]
    NotFound(String),

    /// The binary backend failed to complete the operation
    #[error("Binary backend failed: {0}")]
    Backend(String),
}

/// Resolves opaque binary handles to their byte content.
///
/// Implementations must be `Send + Sync`; resolution is async because the
/// backing store is typically remote.
#[async_trait]
pub trait BinaryResolver: Send + Sync {
    /// Resolve a handle to its stored bytes
    ///
    /// Fails with [`BinaryError::NotFound`] if the handle is unknown.
    async fn resolve(&self, handle: &BinaryHandle) -> Result<Vec<u8>, BinaryError>;
}

/// In-memory resolver over a fixed handle -> bytes map (tests, bootstrap).
#[derive(Debug, Default)]
pub struct MemoryBinaryResolver {
    entries: std::collections::HashMap<String, Vec<u8>>,
}

impl MemoryBinaryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content under a handle path fragment
    pub fn insert(&mut self, handle: impl Into<String>, content: Vec<u8>) {
        self.entries.insert(handle.into(), content);
    }
}

#[async_trait]
impl BinaryResolver for MemoryBinaryResolver {
    async fn resolve(&self, handle: &BinaryHandle) -> Result<Vec<u8>, BinaryError> {
        self.entries
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| BinaryError::NotFound(handle.as_str().to_string()))
    }
}
