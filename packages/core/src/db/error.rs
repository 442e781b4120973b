//! Fact Store Error Types
//!
//! Error types for fact-log persistence. Backend failures surface as
//! `BackendUnavailable` and are never retried inside this layer; retry
//! policy belongs to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Fact store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document-collection backend failed to complete an operation
    #[error("Backend unavailable: {context}")]
    BackendUnavailable { context: String },

    /// Failed to establish the backend connection
    #[error("Failed to connect to fact store at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Failed to initialize the fact store schema
    #[error("Failed to initialize fact store schema: {0}")]
    InitializationFailed(String),

    /// Failed to create the parent directory for the store file
    #[error("Failed to create parent directory for fact store: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// A stored document does not decode to a valid fact
    #[error("Malformed fact document: {0}")]
    MalformedDocument(String),
}

impl StoreError {
    /// Create a backend unavailable error with context
    pub fn backend_unavailable(context: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            context: context.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Create an initialization failed error
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    /// Create a malformed document error
    pub fn malformed_document(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }
}
