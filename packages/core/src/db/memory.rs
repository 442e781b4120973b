//! In-Memory Fact Collection
//!
//! A process-local `FactCollection` over a `tokio::sync::RwLock`-guarded
//! vector. Used by tests and bootstrap paths; behaviour matches the Turso
//! backend (append-only, filter with AND logic, streamed results). Unlike
//! the backend binding there is no cursor to hold open: an insert is
//! atomic under the write lock, so every echoed document is durable by
//! the time the stream is returned, and query streams emit a snapshot
//! taken under the read lock.

use crate::db::{DocumentStream, FactCollection, FactDocument, FactFilter, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory document collection for the fact log
#[derive(Debug, Default)]
pub struct MemoryFactCollection {
    documents: RwLock<Vec<FactDocument>>,
}

impl MemoryFactCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl FactCollection for MemoryFactCollection {
    async fn insert(&self, documents: Vec<FactDocument>) -> Result<DocumentStream, StoreError> {
        debug!(count = documents.len(), "inserting fact documents");
        let mut guard = self.documents.write().await;
        guard.extend(documents.iter().cloned());
        drop(guard);

        let stored: Vec<_> = documents.into_iter().map(Ok).collect();
        Ok(Box::pin(tokio_stream::iter(stored)))
    }

    async fn query(&self, filter: FactFilter) -> Result<DocumentStream, StoreError> {
        let guard = self.documents.read().await;
        let matched: Vec<_> = guard
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .map(Ok)
            .collect();
        debug!(count = matched.len(), ?filter, "queried fact documents");
        Ok(Box::pin(tokio_stream::iter(matched)))
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut guard = self.documents.write().await;
        debug!(count = guard.len(), "clearing fact collection");
        guard.clear();
        Ok(())
    }
}
