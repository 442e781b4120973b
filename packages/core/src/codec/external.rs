//! External Property Wire Shapes
//!
//! The wire-shape counterpart of the internal value model: a named, typed
//! envelope carrying either one scalar payload or an ordered sequence of
//! same-typed payloads. Envelopes carry no ownership semantics and are
//! built fresh on each conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// External property type tags (exhaustive wire contract).
///
/// Serialized as the exact tag strings (`STRING`, `BINARY_INPUT`, ...).
/// Each tag also has a list form, expressed by the `values` envelope of
/// [`ExternalProperty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Binary,
    BinaryInput,
    Node,
    ParameterizedNode,
}

impl PropertyKind {
    /// Wire tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "STRING",
            PropertyKind::Integer => "INTEGER",
            PropertyKind::Long => "LONG",
            PropertyKind::Double => "DOUBLE",
            PropertyKind::Boolean => "BOOLEAN",
            PropertyKind::Date => "DATE",
            PropertyKind::Binary => "BINARY",
            PropertyKind::BinaryInput => "BINARY_INPUT",
            PropertyKind::Node => "NODE",
            PropertyKind::ParameterizedNode => "PARAMETERIZED_NODE",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire form of a parameterized node reference: the referenced path plus
/// the relationship property bag (a JSON object, opaque to this layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
    /// Path string of the referenced node
    pub path: String,

    /// Relationship metadata attached to the reference
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl ExternalReference {
    pub fn new(path: impl Into<String>, properties: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            properties,
        }
    }
}

/// One payload slot of an external property.
///
/// Every tag carries its payload textually except `PARAMETERIZED_NODE`,
/// which carries a `{path, properties}` structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalValue {
    /// Textual payload (scalars, paths, binary tokens, stream keys)
    Text(String),
    /// Structured payload for parameterized node references
    Reference(ExternalReference),
}

impl ExternalValue {
    pub fn text(value: impl Into<String>) -> Self {
        ExternalValue::Text(value.into())
    }
}

/// The wire envelope for one named property: a type tag plus either one
/// scalar payload (`value`) or an ordered list of payloads (`values`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProperty {
    /// Wire type tag
    #[serde(rename = "type")]
    pub kind: PropertyKind,

    /// Scalar payload (absent for list properties)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ExternalValue>,

    /// Ordered list payload (absent for scalar properties)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ExternalValue>>,
}

impl ExternalProperty {
    /// Scalar envelope
    pub fn scalar(kind: PropertyKind, value: ExternalValue) -> Self {
        Self {
            kind,
            value: Some(value),
            values: None,
        }
    }

    /// Scalar envelope with a textual payload
    pub fn text(kind: PropertyKind, value: impl Into<String>) -> Self {
        Self::scalar(kind, ExternalValue::text(value))
    }

    /// List envelope; element order is preserved
    pub fn list(kind: PropertyKind, values: Vec<ExternalValue>) -> Self {
        Self {
            kind,
            value: None,
            values: Some(values),
        }
    }

    /// Whether this envelope carries the list form
    pub fn is_list(&self) -> bool {
        self.values.is_some()
    }
}
