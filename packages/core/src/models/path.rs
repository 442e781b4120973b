//! Node Path Identifier
//!
//! A `NodePath` is the immutable, slash-delimited identifier of a node in
//! the content tree (e.g. `/catalog/products/sku-42`). Two paths are equal
//! iff their string forms are equal; the parent path is derived by
//! truncating the last segment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable hierarchical node identifier.
///
/// Serializes transparently as its string form, so it can be used directly
/// in wire shapes and persisted documents.
///
/// # Examples
///
/// ```rust
/// use strata_core::models::NodePath;
///
/// let path = NodePath::new("/a/b");
/// assert_eq!(path.name(), "b");
/// assert_eq!(path.parent(), Some(NodePath::new("/a")));
/// assert_eq!(NodePath::new("/a").parent(), Some(NodePath::root()));
/// assert_eq!(NodePath::root().parent(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Create a path from its string form
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The root path `/`
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// String form of the path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Last path segment (the node name); empty for the root path
    pub fn name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }

    /// Parent path, derived by truncating the last segment
    ///
    /// Returns `None` for the root path.
    pub fn parent(&self) -> Option<NodePath> {
        let trimmed = self.0.trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let idx = trimmed.rfind('/')?;
        if idx == 0 {
            Some(NodePath::root())
        } else {
            Some(NodePath::new(&trimmed[..idx]))
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for NodePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_string_equality() {
        assert_eq!(NodePath::new("/a/b"), NodePath::new("/a/b"));
        assert_ne!(NodePath::new("/a/b"), NodePath::new("/a/b/"));
    }

    #[test]
    fn test_parent_of_nested_path() {
        assert_eq!(NodePath::new("/a/b/c").parent(), Some(NodePath::new("/a/b")));
        assert_eq!(NodePath::new("/a/b").parent(), Some(NodePath::new("/a")));
    }

    #[test]
    fn test_parent_of_top_level_is_root() {
        assert_eq!(NodePath::new("/a").parent(), Some(NodePath::root()));
    }

    #[test]
    fn test_root_has_no_parent() {
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_name_is_last_segment() {
        assert_eq!(NodePath::new("/a/b/c").name(), "c");
        assert_eq!(NodePath::new("/a").name(), "a");
        assert_eq!(NodePath::root().name(), "");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let path = NodePath::new("/a/b");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"/a/b\"");
        let back: NodePath = serde_json::from_str("\"/a/b\"").unwrap();
        assert_eq!(back, path);
    }
}
