//! Error types for jstore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The three path errors form the document taxonomy:
//! - `NotFound`: a segment is absent on a non-materializing operation
//! - `PathConflict`: a write or remove tried to descend through a scalar
//! - `DuplicatePath`: `post` targeted a path that already holds a value

use std::io;
use thiserror::Error;

/// Result type alias for jstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document store
#[derive(Debug, Error)]
pub enum Error {
    /// Path does not resolve to a value
    #[error("path not found: {path}")]
    NotFound {
        /// The requested path, in `/a/b` form
        path: String,
    },

    /// An existing non-container value blocks traversal
    #[error("path conflict at {path}: segment '{segment}' cannot index into {found}")]
    PathConflict {
        /// The requested path, in `/a/b` form
        path: String,
        /// The segment that could not be applied
        segment: String,
        /// Type name of the value that was found instead of a container
        found: &'static str,
    },

    /// `post` on a path that already exists
    #[error("path already exists: {path}")]
    DuplicatePath {
        /// The requested path, in `/a/b` form
        path: String,
    },

    /// Invalid operation or state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be read or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// A deferred call never produced a result
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl Error {
    /// Build a `NotFound` error for a path
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Build a `DuplicatePath` error for a path
    pub fn duplicate(path: impl Into<String>) -> Self {
        Error::DuplicatePath { path: path.into() }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for `PathConflict`
    pub fn is_path_conflict(&self) -> bool {
        matches!(self, Error::PathConflict { .. })
    }

    /// True for `DuplicatePath`
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicatePath { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
