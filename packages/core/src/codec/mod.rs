//! Property Representation Codec
//!
//! Lossless, two-directional conversion between the internal value model
//! ([`Value`]) and the external wire representation
//! ([`ExternalProperty`]), for every property of a node.
//!
//! # Architecture
//!
//! - **Internalize** (ingest): per-tag parsing of wire payloads into typed
//!   values, with binary-stream lookup against a caller-supplied map
//! - **Externalize** (serve): per-kind rendering of typed values into wire
//!   envelopes, rewriting binary handles into retrieval URLs
//! - **Purely computational**: no I/O and no suspension points; the binary
//!   input map is already materialized by the caller
//!
//! Configuration (host/port for URL composition) is an explicit immutable
//! value passed to the constructor, immutable after initialization and
//! safe to share across callers.

mod binary;
mod error;
mod external;

pub use binary::{BinaryError, BinaryResolver, MemoryBinaryResolver};
pub use error::CodecError;
pub use external::{ExternalProperty, ExternalReference, ExternalValue, PropertyKind};

use crate::models::time::{format_wire_date, parse_wire_date};
use crate::models::{
    BinaryHandle, NodeReference, ParameterizedNodeReference, TypedList, Value, ValueKind,
};
use std::collections::HashMap;

/// Named binary input streams supplied by the caller during ingest.
///
/// `BINARY_INPUT` properties name their stream by key into this map.
pub type BinaryInputs = HashMap<String, Vec<u8>>;

/// Codec configuration: host and port used verbatim when composing binary
/// retrieval URLs. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub host: String,
    pub port: String,
}

impl CodecConfig {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }

    /// Compose the retrieval URL for a binary handle's path fragment.
    ///
    /// The fragment stays opaque; external callers get a fetchable
    /// location without learning anything about internal binary storage.
    pub fn binary_url(&self, fragment: &str) -> String {
        format!(
            "http://{}:{}/v1/binary?path={}",
            self.host, self.port, fragment
        )
    }
}

/// Converts node properties between internal and external representation.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use strata_core::codec::{CodecConfig, PropertyCodec};
/// use strata_core::models::Value;
///
/// let codec = PropertyCodec::new(CodecConfig::new("localhost", "8080"));
/// let mut values = HashMap::new();
/// values.insert("title".to_string(), Value::String("hello".to_string()));
///
/// let external = codec.externalize(&values).unwrap();
/// let back = codec.internalize(&external, &HashMap::new()).unwrap();
/// assert_eq!(back, values);
/// ```
#[derive(Debug, Clone)]
pub struct PropertyCodec {
    config: CodecConfig,
}

impl PropertyCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Convert external wire properties into internal values.
    ///
    /// Scalar payloads are parsed per their declared tag; list payloads
    /// apply the same rules per element and produce a [`TypedList`] tagged
    /// with the element kind, order preserved. `BINARY_INPUT` payloads are
    /// looked up in `binary_inputs` by the property's textual value.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnknownOrInvalidPropertyType`] for a malformed
    ///   payload, naming the offending property and tag
    /// - [`CodecError::MissingBinaryInput`] when a named stream is absent
    ///
    /// A failed conversion returns nothing: no partially converted map
    /// escapes.
    pub fn internalize(
        &self,
        properties: &HashMap<String, ExternalProperty>,
        binary_inputs: &BinaryInputs,
    ) -> Result<HashMap<String, Value>, CodecError> {
        let mut values = HashMap::with_capacity(properties.len());
        for (name, property) in properties {
            values.insert(name.clone(), self.internalize_property(name, property, binary_inputs)?);
        }
        Ok(values)
    }

    /// Convert internal values into external wire properties.
    ///
    /// Binary handles are rewritten into retrieval URLs; dates take the
    /// fixed UTC wire format; list element order is preserved.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnsupportedValueKind`] for a value with no wire
    /// mapping (inline binary content, nested lists, or a list element
    /// that does not match the list's declared element kind).
    pub fn externalize(
        &self,
        values: &HashMap<String, Value>,
    ) -> Result<HashMap<String, ExternalProperty>, CodecError> {
        let mut properties = HashMap::with_capacity(values.len());
        for (name, value) in values {
            let property = match value {
                Value::List(list) => self.externalize_list(name, list)?,
                scalar => {
                    let (tag, payload) = self.externalize_scalar(name, scalar)?;
                    ExternalProperty::scalar(tag, payload)
                }
            };
            properties.insert(name.clone(), property);
        }
        Ok(properties)
    }

    fn internalize_property(
        &self,
        name: &str,
        property: &ExternalProperty,
        binary_inputs: &BinaryInputs,
    ) -> Result<Value, CodecError> {
        match (&property.value, &property.values) {
            (Some(_), Some(_)) => Err(CodecError::invalid_property(
                name,
                property.kind.as_str(),
                "property carries both a scalar and a list payload",
            )),
            (Some(payload), None) => {
                self.internalize_payload(name, property.kind, payload, binary_inputs)
            }
            (None, Some(payloads)) => {
                let mut elements = Vec::with_capacity(payloads.len());
                for payload in payloads {
                    elements.push(self.internalize_payload(
                        name,
                        property.kind,
                        payload,
                        binary_inputs,
                    )?);
                }
                Ok(Value::List(TypedList::new(
                    element_kind(property.kind),
                    elements,
                )))
            }
            (None, None) => Err(CodecError::invalid_property(
                name,
                property.kind.as_str(),
                "property carries neither a scalar nor a list payload",
            )),
        }
    }

    fn internalize_payload(
        &self,
        name: &str,
        kind: PropertyKind,
        payload: &ExternalValue,
        binary_inputs: &BinaryInputs,
    ) -> Result<Value, CodecError> {
        match (kind, payload) {
            (PropertyKind::ParameterizedNode, ExternalValue::Reference(reference)) => {
                // The property bag describes the relationship; it is passed
                // through untouched, not recursively internalized.
                Ok(Value::ParameterizedNode(ParameterizedNodeReference::new(
                    reference.path.as_str(),
                    reference.properties.clone(),
                )))
            }
            (PropertyKind::ParameterizedNode, ExternalValue::Text(_)) => {
                Err(CodecError::invalid_property(
                    name,
                    kind.as_str(),
                    "expected a {path, properties} structure",
                ))
            }
            (_, ExternalValue::Reference(_)) => Err(CodecError::invalid_property(
                name,
                kind.as_str(),
                "expected a textual payload",
            )),
            (_, ExternalValue::Text(text)) => {
                self.internalize_text(name, kind, text, binary_inputs)
            }
        }
    }

    fn internalize_text(
        &self,
        name: &str,
        kind: PropertyKind,
        text: &str,
        binary_inputs: &BinaryInputs,
    ) -> Result<Value, CodecError> {
        match kind {
            PropertyKind::String => Ok(Value::String(text.to_string())),
            PropertyKind::Integer => text
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|e| CodecError::invalid_property(name, kind.as_str(), e.to_string())),
            PropertyKind::Long => text
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|e| CodecError::invalid_property(name, kind.as_str(), e.to_string())),
            PropertyKind::Double => text
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|e| CodecError::invalid_property(name, kind.as_str(), e.to_string())),
            PropertyKind::Boolean => text
                .parse::<bool>()
                .map(Value::Boolean)
                .map_err(|e| CodecError::invalid_property(name, kind.as_str(), e.to_string())),
            PropertyKind::Date => parse_wire_date(text)
                .map(Value::Date)
                .map_err(|e| CodecError::invalid_property(name, kind.as_str(), e.to_string())),
            PropertyKind::Binary => Ok(Value::Binary(BinaryHandle::new(text))),
            PropertyKind::BinaryInput => binary_inputs
                .get(text)
                .map(|bytes| Value::BinaryContent(bytes.clone()))
                .ok_or_else(|| CodecError::missing_binary_input(name, text)),
            PropertyKind::Node => Ok(Value::Node(NodeReference::new(text))),
            PropertyKind::ParameterizedNode => Err(CodecError::invalid_property(
                name,
                kind.as_str(),
                "expected a {path, properties} structure",
            )),
        }
    }

    fn externalize_list(&self, name: &str, list: &TypedList) -> Result<ExternalProperty, CodecError> {
        let tag = wire_kind(list.element_kind)
            .ok_or_else(|| CodecError::unsupported_kind(name, list.element_kind))?;
        let mut payloads = Vec::with_capacity(list.values.len());
        for element in &list.values {
            if element.kind() != list.element_kind {
                return Err(CodecError::unsupported_kind(name, element.kind()));
            }
            let (_, payload) = self.externalize_scalar(name, element)?;
            payloads.push(payload);
        }
        Ok(ExternalProperty::list(tag, payloads))
    }

    fn externalize_scalar(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<(PropertyKind, ExternalValue), CodecError> {
        match value {
            Value::String(s) => Ok((PropertyKind::String, ExternalValue::text(s.clone()))),
            Value::Integer(i) => Ok((PropertyKind::Integer, ExternalValue::text(i.to_string()))),
            Value::Long(l) => Ok((PropertyKind::Long, ExternalValue::text(l.to_string()))),
            Value::Double(d) => Ok((PropertyKind::Double, ExternalValue::text(d.to_string()))),
            Value::Boolean(b) => Ok((PropertyKind::Boolean, ExternalValue::text(b.to_string()))),
            Value::Date(date) => Ok((
                PropertyKind::Date,
                ExternalValue::text(format_wire_date(date)),
            )),
            Value::Binary(handle) => Ok((
                PropertyKind::Binary,
                ExternalValue::text(self.config.binary_url(handle.as_str())),
            )),
            Value::Node(reference) => Ok((
                PropertyKind::Node,
                ExternalValue::text(reference.path.as_str()),
            )),
            Value::ParameterizedNode(reference) => Ok((
                PropertyKind::ParameterizedNode,
                ExternalValue::Reference(ExternalReference::new(
                    reference.path.as_str(),
                    reference.properties.clone(),
                )),
            )),
            // Ingest-only: bytes are handed to the binary manager, never
            // rendered on the wire.
            Value::BinaryContent(_) => {
                Err(CodecError::unsupported_kind(name, ValueKind::BinaryContent))
            }
            // Lists do not nest.
            Value::List(_) => Err(CodecError::unsupported_kind(name, ValueKind::List)),
        }
    }
}

/// Internal element kind produced when internalizing a list with the given
/// wire tag.
fn element_kind(kind: PropertyKind) -> ValueKind {
    match kind {
        PropertyKind::String => ValueKind::String,
        PropertyKind::Integer => ValueKind::Integer,
        PropertyKind::Long => ValueKind::Long,
        PropertyKind::Double => ValueKind::Double,
        PropertyKind::Boolean => ValueKind::Boolean,
        PropertyKind::Date => ValueKind::Date,
        PropertyKind::Binary => ValueKind::Binary,
        PropertyKind::BinaryInput => ValueKind::BinaryContent,
        PropertyKind::Node => ValueKind::Node,
        PropertyKind::ParameterizedNode => ValueKind::ParameterizedNode,
    }
}

/// Wire tag for a list of the given internal element kind, if one exists.
fn wire_kind(kind: ValueKind) -> Option<PropertyKind> {
    match kind {
        ValueKind::String => Some(PropertyKind::String),
        ValueKind::Integer => Some(PropertyKind::Integer),
        ValueKind::Long => Some(PropertyKind::Long),
        ValueKind::Double => Some(PropertyKind::Double),
        ValueKind::Boolean => Some(PropertyKind::Boolean),
        ValueKind::Date => Some(PropertyKind::Date),
        ValueKind::Binary => Some(PropertyKind::Binary),
        ValueKind::Node => Some(PropertyKind::Node),
        ValueKind::ParameterizedNode => Some(PropertyKind::ParameterizedNode),
        ValueKind::BinaryContent | ValueKind::List => None,
    }
}
