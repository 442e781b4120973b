//! FactCollection Trait - Document Store Abstraction
//!
//! This module defines the `FactCollection` trait that abstracts the
//! document store holding the inverse reference fact log. The trait
//! enables multiple backend implementations (in-memory, libsql/Turso)
//! without changing the index algorithm.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async to support both embedded and
//!    network backends
//! 2. **Streamed results**: insert and query return lazily consumable
//!    streams rather than materialized vectors, so callers can cancel
//!    early and each fact's durability is independently observable
//! 3. **No validation**: the per-pair monotonic-revision invariant is the
//!    writer's responsibility; the collection stores what it is given

use crate::models::{InverseReferenceFact, NodePath, ReferenceState, RevisionNumber};
use crate::db::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;

/// Lazily produced sequence of fact documents.
///
/// Dropping the stream before exhaustion releases the backing cursor.
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<FactDocument, StoreError>> + Send>>;

/// Flat persisted form of one [`InverseReferenceFact`].
///
/// Field names are a compatibility contract with existing data:
/// `nodePath`, `referringNodePath`, `revision`, `state` - exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDocument {
    pub node_path: String,
    pub referring_node_path: String,
    pub revision: RevisionNumber,
    pub state: String,
}

impl From<&InverseReferenceFact> for FactDocument {
    fn from(fact: &InverseReferenceFact) -> Self {
        Self {
            node_path: fact.node_path.as_str().to_string(),
            referring_node_path: fact.referring_node_path.as_str().to_string(),
            revision: fact.revision,
            state: fact.state.as_str().to_string(),
        }
    }
}

impl FactDocument {
    /// Decode the document back into a fact
    ///
    /// Fails with [`StoreError::MalformedDocument`] if the state encoding
    /// is not one of `"NORMAL"` / `"DELETED"`.
    pub fn into_fact(self) -> Result<InverseReferenceFact, StoreError> {
        let state = ReferenceState::from_str_encoded(&self.state).ok_or_else(|| {
            StoreError::malformed_document(format!(
                "unrecognized reference state '{}' for node '{}'",
                self.state, self.node_path
            ))
        })?;
        Ok(InverseReferenceFact {
            node_path: NodePath::new(self.node_path),
            referring_node_path: NodePath::new(self.referring_node_path),
            revision: self.revision,
            state,
        })
    }
}

/// Filter for fact queries.
///
/// All set fields combine with AND logic; unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactFilter {
    /// Match documents with this exact `nodePath`
    pub node_path: Option<String>,

    /// Match documents with `revision <= max_revision`
    pub max_revision: Option<RevisionNumber>,
}

impl FactFilter {
    /// All facts for one node path
    pub fn for_node(node_path: impl Into<String>) -> Self {
        Self {
            node_path: Some(node_path.into()),
            max_revision: None,
        }
    }

    /// Facts for one node path visible at or before a revision
    pub fn as_of(node_path: impl Into<String>, revision: RevisionNumber) -> Self {
        Self {
            node_path: Some(node_path.into()),
            max_revision: Some(revision),
        }
    }

    /// Whether a document satisfies this filter
    pub fn matches(&self, document: &FactDocument) -> bool {
        if let Some(node_path) = &self.node_path {
            if &document.node_path != node_path {
                return false;
            }
        }
        if let Some(max_revision) = self.max_revision {
            if document.revision > max_revision {
                return false;
            }
        }
        true
    }
}

/// Abstraction over the document collection backing the fact log.
///
/// Implementations must be `Send + Sync` so the index can be shared across
/// async tasks.
#[async_trait]
pub trait FactCollection: Send + Sync {
    /// Append documents to the collection
    ///
    /// Returns a stream of the stored documents. Each document's
    /// durability is independent: a document yielded by the stream has
    /// been persisted even if a later one fails.
    async fn insert(&self, documents: Vec<FactDocument>) -> Result<DocumentStream, StoreError>;

    /// Query documents matching a filter
    ///
    /// Unknown node paths yield an empty stream, not an error.
    async fn query(&self, filter: FactFilter) -> Result<DocumentStream, StoreError>;

    /// Remove every document from the collection (test/bootstrap only)
    async fn delete_all(&self) -> Result<(), StoreError>;
}
