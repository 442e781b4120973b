//! Data Models
//!
//! This module contains the core data structures of the metadata layer:
//!
//! - `NodePath` - Immutable hierarchical node identifier
//! - `Value` and friends - The closed property value model
//! - `InverseReferenceFact` - The unit of the append-only reference log
//!
//! Everything here is plain data with no I/O; persistence lives in `db`
//! and wire conversion in `codec`.

mod fact;
mod path;
mod value;

pub mod time;

pub use fact::{InverseReferenceFact, ReferenceState, RevisionNumber};
pub use path::NodePath;
pub use value::{
    BinaryHandle, NodeReference, ParameterizedNodeReference, TypedList, Value, ValueKind,
};
