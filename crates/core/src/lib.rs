//! Core types and traits for jstore
//!
//! This crate defines the foundational pieces used throughout the system:
//! - Error: Error type hierarchy (`NotFound`, `PathConflict`, `DuplicatePath`, ...)
//! - DocPath: `/`-delimited path into the document
//! - Path resolver: `read_at`, `write_at` (materializing), `remove_at`
//! - QueryOptions / apply_query: read-time filter, limit and sort
//! - Value helpers: enumeration order, truthiness, loose comparison
//! - Storage: the durable key-value slot the document is persisted in
//!
//! Everything here is stateless; the document store lives in `jstore-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod path;
pub mod query;
pub mod traits;
pub mod value;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use path::{read_at, remove_at, write_at, DocPath, MAX_ARRAY_SIZE};
pub use query::{apply_query, Predicate, QueryOptions};
pub use traits::Storage;
pub use value::{is_truthy, type_name, values_of};

/// Document values are plain JSON trees
pub use serde_json::Value;
