//! Inverse Reference Facts
//!
//! The unit of the append-only reference log: one fact per changed
//! reference, carrying the revision at which the change was committed.
//! Facts are immutable once written; the log only grows. A `Deleted` fact
//! is a tombstone - a first-class record that a reference was removed, not
//! an absence.

use crate::models::NodePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing identifier of a committed repository snapshot.
///
/// Revisions are totally ordered and never reused or decremented. This core
/// does not allocate revisions; the (external) commit sequencer does. The
/// persisted encoding is a signed 64-bit integer, so revisions above
/// `i64::MAX` are rejected at the storage boundary rather than wrapped.
pub type RevisionNumber = u64;

/// State recorded by a reference fact.
///
/// Persisted encoding is the exact strings `"NORMAL"` / `"DELETED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceState {
    /// The reference exists at this revision
    Normal,
    /// Tombstone: the reference was removed at this revision
    Deleted,
}

impl ReferenceState {
    /// Persisted string encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceState::Normal => "NORMAL",
            ReferenceState::Deleted => "DELETED",
        }
    }

    /// Parse the persisted string encoding
    pub fn from_str_encoded(s: &str) -> Option<Self> {
        match s {
            "NORMAL" => Some(ReferenceState::Normal),
            "DELETED" => Some(ReferenceState::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the append-only reference log.
///
/// Reads "as of revision R" reconstruct the reference set around a node
/// from these facts. Invariant (upheld by the writer, never checked here):
/// for a fixed `(node_path, referring_node_path)` pair, facts are totally
/// ordered by `revision` and no two facts for the pair share a revision.
///
/// Serialized field names match the persisted document contract:
/// `nodePath`, `referringNodePath`, `revision`, `state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverseReferenceFact {
    /// The referenced node
    pub node_path: NodePath,

    /// The node holding the reference
    pub referring_node_path: NodePath,

    /// Revision at which this fact was committed
    pub revision: RevisionNumber,

    /// Reference state recorded by this fact
    pub state: ReferenceState,
}

impl InverseReferenceFact {
    /// Create a fact
    pub fn new(
        node_path: impl Into<NodePath>,
        referring_node_path: impl Into<NodePath>,
        revision: RevisionNumber,
        state: ReferenceState,
    ) -> Self {
        Self {
            node_path: node_path.into(),
            referring_node_path: referring_node_path.into(),
            revision,
            state,
        }
    }

    /// Whether this fact is a tombstone
    pub fn is_deleted(&self) -> bool {
        self.state == ReferenceState::Deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_encoding_round_trip() {
        assert_eq!(ReferenceState::Normal.as_str(), "NORMAL");
        assert_eq!(ReferenceState::Deleted.as_str(), "DELETED");
        assert_eq!(
            ReferenceState::from_str_encoded("NORMAL"),
            Some(ReferenceState::Normal)
        );
        assert_eq!(
            ReferenceState::from_str_encoded("DELETED"),
            Some(ReferenceState::Deleted)
        );
        assert_eq!(ReferenceState::from_str_encoded("deleted"), None);
    }

    /// Contract test: serialized field names must match the persisted
    /// document contract exactly (existing data interops on these names).
    #[test]
    fn test_fact_serialization_contract() {
        let fact = InverseReferenceFact::new("/target1", "/source1", 3, ReferenceState::Deleted);
        let json = serde_json::to_value(&fact).unwrap();

        assert_eq!(json["nodePath"], "/target1");
        assert_eq!(json["referringNodePath"], "/source1");
        assert_eq!(json["revision"], 3);
        assert_eq!(json["state"], "DELETED");
    }

    #[test]
    fn test_is_deleted() {
        let fact = InverseReferenceFact::new("/t", "/s", 1, ReferenceState::Normal);
        assert!(!fact.is_deleted());
        let tombstone = InverseReferenceFact::new("/t", "/s", 2, ReferenceState::Deleted);
        assert!(tombstone.is_deleted());
    }
}
