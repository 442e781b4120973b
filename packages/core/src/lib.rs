//! Strata Metadata Core
//!
//! This crate provides the metadata layer of the Strata hierarchical,
//! versioned content store: which nodes exist, what properties they carry,
//! and which nodes refer to which other nodes, as of any committed revision.
//!
//! # Architecture
//!
//! - **Closed value model**: Property values are a tagged union, so every
//!   conversion site is matched exhaustively at compile time
//! - **Append-only fact log**: Reference changes are recorded as immutable
//!   facts; point-in-time state is reconstructed, never mutated in place
//! - **libsql/Turso**: Embedded SQLite-compatible backend for the fact log
//! - **Streamed reads**: Backend calls produce lazy, cancellable streams
//!
//! # Modules
//!
//! - [`models`] - Value model, node paths, and reference facts
//! - [`codec`] - Internal/external property representation conversion
//! - [`db`] - Fact-log persistence (abstract collection + backends)
//! - [`index`] - Revision-scoped inverse reference index

pub mod codec;
pub mod db;
pub mod index;
pub mod models;

// Re-export commonly used types
pub use codec::{
    BinaryError, BinaryResolver, CodecConfig, CodecError, ExternalProperty, ExternalReference,
    ExternalValue, PropertyCodec, PropertyKind,
};
pub use db::{
    FactCollection, FactDocument, FactFilter, MemoryFactCollection, StoreError,
    TursoFactCollection,
};
pub use index::InverseReferenceIndex;
pub use models::{
    BinaryHandle, InverseReferenceFact, NodePath, NodeReference, ParameterizedNodeReference,
    ReferenceState, RevisionNumber, TypedList, Value, ValueKind,
};
