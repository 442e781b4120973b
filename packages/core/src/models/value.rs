//! Property Value Model
//!
//! The closed set of property value kinds every other component operates
//! on. Re-architected from a runtime-checked class hierarchy into a tagged
//! union: adding a kind is a compile error everywhere it must be handled.
//!
//! Values are transient - constructed per request by the codec or the
//! session layer and never persisted directly.

use crate::models::NodePath;
use chrono::{DateTime, Utc};
use std::fmt;

/// A reference to another node by path, carrying no further state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReference {
    /// Path of the referenced node
    pub path: NodePath,
}

impl NodeReference {
    pub fn new(path: impl Into<NodePath>) -> Self {
        Self { path: path.into() }
    }
}

/// A node reference whose relationship itself carries metadata.
///
/// The property bag describes the *relationship*, not the referenced
/// node's own properties. It is kept in JSON form and passed through the
/// codec untouched on ingest; the codec does not interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedNodeReference {
    /// Path of the referenced node
    pub path: NodePath,

    /// Relationship metadata (JSON object)
    pub properties: serde_json::Value,
}

impl ParameterizedNodeReference {
    pub fn new(path: impl Into<NodePath>, properties: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            properties,
        }
    }
}

/// Opaque identifier for out-of-band binary content.
///
/// The internal path fragment stays opaque to callers; external consumers
/// receive a retrieval URL composed by the codec, and bytes are resolved
/// only through the external binary-content resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryHandle(String);

impl BinaryHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Internal path fragment of the binary content
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinaryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runtime kind tag of a [`Value`], used in dispatch and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Binary,
    BinaryContent,
    Node,
    ParameterizedNode,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Long => "Long",
            ValueKind::Double => "Double",
            ValueKind::Boolean => "Boolean",
            ValueKind::Date => "Date",
            ValueKind::Binary => "Binary",
            ValueKind::BinaryContent => "BinaryContent",
            ValueKind::Node => "Node",
            ValueKind::ParameterizedNode => "ParameterizedNode",
            ValueKind::List => "List",
        };
        f.write_str(name)
    }
}

/// Homogeneous ordered list of values, tagged with its element kind.
///
/// The tag replaces runtime downcasting of list elements: consumers match
/// on `element_kind` once instead of asserting each element's type.
/// Invariant: every element's kind equals `element_kind` (the codec
/// enforces this on both conversion directions).
#[derive(Debug, Clone, PartialEq)]
pub struct TypedList {
    /// Kind of every element in the list
    pub element_kind: ValueKind,

    /// Ordered elements; order is always preserved
    pub values: Vec<Value>,
}

impl TypedList {
    pub fn new(element_kind: ValueKind, values: Vec<Value>) -> Self {
        Self {
            element_kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every element matches the declared element kind
    pub fn is_homogeneous(&self) -> bool {
        self.values.iter().all(|v| v.kind() == self.element_kind)
    }
}

/// Internal property value: the discriminated union over all supported
/// kinds.
///
/// `BinaryContent` is ingest-only: it carries bytes looked up from the
/// caller-supplied binary input map and is handed onward to the binary
/// manager; it has no wire representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Binary(BinaryHandle),
    BinaryContent(Vec<u8>),
    Node(NodeReference),
    ParameterizedNode(ParameterizedNodeReference),
    List(TypedList),
}

impl Value {
    /// Runtime kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Long(_) => ValueKind::Long,
            Value::Double(_) => ValueKind::Double,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Date(_) => ValueKind::Date,
            Value::Binary(_) => ValueKind::Binary,
            Value::BinaryContent(_) => ValueKind::BinaryContent,
            Value::Node(_) => ValueKind::Node,
            Value::ParameterizedNode(_) => ValueKind::ParameterizedNode,
            Value::List(_) => ValueKind::List,
        }
    }
}
