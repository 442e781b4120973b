//! Fact-Log Persistence Layer
//!
//! This module handles persistence of the inverse reference fact log
//! through an abstract document-collection interface:
//!
//! - `FactCollection` - the adapter boundary (insert / query / delete_all)
//! - `MemoryFactCollection` - in-process backend for tests and bootstrap
//! - `TursoFactCollection` - embedded libsql/Turso backend
//!
//! # Architecture
//!
//! Each fact is stored as a flat document with fields `nodePath`,
//! `referringNodePath`, `revision` (filterable with <=), and `state`.
//! Reads and writes are exposed as lazy streams so a caller can stop
//! consuming early; dropping the stream releases the backing cursor.

mod collection;
mod error;
mod memory;
mod turso;

pub use collection::{DocumentStream, FactCollection, FactDocument, FactFilter};
pub use error::StoreError;
pub use memory::MemoryFactCollection;
pub use turso::TursoFactCollection;
