//! Revision-Scoped Inverse Reference Index
//!
//! Answers "who pointed at node X as of revision R" by reconstructing
//! point-in-time state from the append-only fact log: select facts at or
//! before R, group by referring node, keep the latest fact per group.
//!
//! Tombstoned (`DELETED`) winners are returned, never filtered out:
//! callers must distinguish "never referenced" (absent from the result)
//! from "referenced, later removed" (`DELETED` winner present), which
//! later compaction and consistency checks rely on.
//!
//! The index is the read/append surface only. It performs no locking and
//! no validation: the single-threaded commit sequencer upholds the
//! per-pair monotonic-revision invariant, and retry policy lives with the
//! caller.

use crate::db::{FactCollection, FactDocument, FactFilter, StoreError};
use crate::models::{InverseReferenceFact, NodePath, RevisionNumber};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Lazily produced sequence of reference facts.
pub type FactStream = Pin<Box<dyn Stream<Item = Result<InverseReferenceFact, StoreError>> + Send>>;

/// Read/append surface over the inverse reference fact log.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use strata_core::db::MemoryFactCollection;
/// use strata_core::index::InverseReferenceIndex;
/// use strata_core::models::{InverseReferenceFact, NodePath, ReferenceState};
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let index = InverseReferenceIndex::new(Arc::new(MemoryFactCollection::new()));
///
///     let fact = InverseReferenceFact::new("/target", "/source", 1, ReferenceState::Normal);
///     index.append(vec![fact]).await?.collect::<Vec<_>>().await;
///
///     let mut visible = index.query_as_of(&NodePath::new("/target"), 1).await?;
///     while let Some(fact) = visible.next().await {
///         println!("referrer: {}", fact?.referring_node_path);
///     }
///     Ok(())
/// }
/// ```
pub struct InverseReferenceIndex {
    collection: Arc<dyn FactCollection>,
}

impl InverseReferenceIndex {
    pub fn new(collection: Arc<dyn FactCollection>) -> Self {
        Self { collection }
    }

    /// Append facts to the log
    ///
    /// No dedup and no validation beyond what the writer already upholds;
    /// order of facts within one call carries no semantic weight, since
    /// every fact carries its own revision. Returns a stream of the stored
    /// facts; each yielded fact has been durably written.
    pub async fn append(&self, facts: Vec<InverseReferenceFact>) -> Result<FactStream, StoreError> {
        debug!(count = facts.len(), "appending inverse reference facts");
        let documents: Vec<FactDocument> = facts.iter().map(FactDocument::from).collect();
        let stored = self.collection.insert(documents).await?;
        Ok(Box::pin(
            stored.map(|result| result.and_then(FactDocument::into_fact)),
        ))
    }

    /// Reconstruct the reference facts touching `node_path` visible as of
    /// `revision`
    ///
    /// Latest-wins, per-referring-node snapshot over the log: among all
    /// facts for the node at or before the revision, the most recent fact
    /// per referring node wins. Ties cannot occur per the log invariant.
    /// Winners are returned in no guaranteed order; `DELETED` winners are
    /// included.
    ///
    /// A node with no facts, or a revision below the node's first fact,
    /// yields an empty stream, not an error.
    pub async fn query_as_of(
        &self,
        node_path: &NodePath,
        revision: RevisionNumber,
    ) -> Result<FactStream, StoreError> {
        let filter = FactFilter::as_of(node_path.as_str(), revision);
        let mut selected = self.collection.query(filter).await?;

        let mut winners: HashMap<String, InverseReferenceFact> = HashMap::new();
        while let Some(document) = selected.next().await {
            let fact = document?.into_fact()?;
            let key = fact.referring_node_path.as_str().to_string();
            match winners.entry(key) {
                Entry::Occupied(mut winner) => {
                    if fact.revision > winner.get().revision {
                        winner.insert(fact);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(fact);
                }
            }
        }
        debug!(
            node_path = %node_path,
            revision,
            winners = winners.len(),
            "reconstructed as-of reference set"
        );

        let facts: Vec<_> = winners.into_values().map(Ok).collect();
        Ok(Box::pin(tokio_stream::iter(facts)))
    }

    /// Clear the backing collection entirely (test/bootstrap only)
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.collection.delete_all().await
    }
}

// Include tests
#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
