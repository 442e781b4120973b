//! Codec Error Types
//!
//! Errors raised while converting between the internal value model and the
//! external wire representation. All are terminal for the conversion that
//! raised them; nothing is retried inside the codec.

use crate::models::ValueKind;
use thiserror::Error;

/// Property conversion errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Internalize met a tag it does not know or a payload it cannot parse
    #[error("Unknown or invalid property type for '{name}' ({tag}): {reason}")]
    UnknownOrInvalidPropertyType {
        name: String,
        tag: String,
        reason: String,
    },

    /// Externalize met an internal value with no wire mapping
    #[error("Unsupported value kind for property '{name}': {kind}")]
    UnsupportedValueKind { name: String, kind: ValueKind },

    /// A BINARY_INPUT property referenced a stream key absent from the
    /// supplied input map
    #[error("Missing binary input '{key}' for property '{name}'")]
    MissingBinaryInput { name: String, key: String },
}

impl CodecError {
    /// Create an unknown-or-invalid property type error
    pub fn invalid_property(
        name: impl Into<String>,
        tag: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnknownOrInvalidPropertyType {
            name: name.into(),
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported value kind error
    pub fn unsupported_kind(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::UnsupportedValueKind {
            name: name.into(),
            kind,
        }
    }

    /// Create a missing binary input error
    pub fn missing_binary_input(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingBinaryInput {
            name: name.into(),
            key: key.into(),
        }
    }
}
