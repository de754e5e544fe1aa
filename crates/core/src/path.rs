//! Document paths and the path resolver
//!
//! A path is a `/`-delimited string. Blank segments are discarded, so `/`,
//! the empty string and `//` all denote the document root. Each remaining
//! segment indexes into the current value: as a key on a mapping, or as a
//! canonical decimal index on a sequence.
//!
//! | Path | Segments |
//! |------|----------|
//! | `/` or `` | (root) |
//! | `/users/15` | `users`, `15` |
//! | `users//15/` | `users`, `15` |
//!
//! # Resolver Operations
//!
//! - [`read_at`]: pure lookup, `NotFound` on any missing or non-indexable step
//! - [`write_at`]: materializing write, creates missing ancestors as mappings
//! - [`remove_at`]: non-materializing delete, ancestors must exist

use crate::error::{Error, Result};
use crate::value::{array_index, type_name};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Largest sequence a write may grow by padding with `null` (1M elements)
pub const MAX_ARRAY_SIZE: usize = 1_000_000;

// =============================================================================
// DocPath
// =============================================================================

/// A parsed path into the document
///
/// # Examples
///
/// ```
/// use jstore_core::path::DocPath;
///
/// let path = DocPath::parse("/users//15/");
/// assert_eq!(path.segments(), &["users".to_string(), "15".to_string()]);
/// assert_eq!(path.to_string(), "/users/15");
///
/// assert!(DocPath::parse("/").is_root());
/// assert!(DocPath::parse("").is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// Create the root path (no segments)
    pub fn root() -> Self {
        DocPath {
            segments: Vec::new(),
        }
    }

    /// Split a path string on `/`, dropping blank segments
    pub fn parse(path: &str) -> Self {
        DocPath {
            segments: path
                .split('/')
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Create a path from already-split segments
    pub fn from_segments(segments: Vec<String>) -> Self {
        DocPath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(key.into());
        self
    }

    /// Get the parent path, or `None` for the root
    pub fn parent(&self) -> Option<DocPath> {
        if self.segments.is_empty() {
            None
        } else {
            Some(DocPath {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Get the last segment, or `None` for the root
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Render as `/a/b`, or `/` for the root
    pub fn to_path_string(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

impl From<&str> for DocPath {
    fn from(path: &str) -> Self {
        DocPath::parse(path)
    }
}

impl From<String> for DocPath {
    fn from(path: String) -> Self {
        DocPath::parse(&path)
    }
}

impl From<&String> for DocPath {
    fn from(path: &String) -> Self {
        DocPath::parse(path)
    }
}

// =============================================================================
// Read
// =============================================================================

/// Resolve `path` against `doc`
///
/// Returns the whole document for the root path.
///
/// # Errors
///
/// `NotFound` if any segment is absent, is not a canonical index on a
/// sequence, or would have to index into a scalar.
///
/// # Examples
///
/// ```
/// use jstore_core::path::{read_at, DocPath};
/// use serde_json::json;
///
/// let doc = json!({"users": {"15": {"name": "A"}}, "tags": ["x", "y"]});
/// assert_eq!(read_at(&doc, &DocPath::parse("/users/15/name")).unwrap(), &json!("A"));
/// assert_eq!(read_at(&doc, &DocPath::parse("/tags/1")).unwrap(), &json!("y"));
/// assert!(read_at(&doc, &DocPath::parse("/users/16")).is_err());
/// ```
pub fn read_at<'a>(doc: &'a Value, path: &DocPath) -> Result<&'a Value> {
    let mut current = doc;
    for segment in path.segments() {
        let next = match current {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| Error::not_found(path.to_path_string()))?;
    }
    Ok(current)
}

// =============================================================================
// Write
// =============================================================================

fn conflict(path: &DocPath, segment: &str, found: &'static str) -> Error {
    Error::PathConflict {
        path: path.to_path_string(),
        segment: segment.to_string(),
        found,
    }
}

/// Fill `items` with `null` up to `idx`, the shape of a sparse sequence.
///
/// Fails instead of allocating when `idx` would grow the sequence past
/// [`MAX_ARRAY_SIZE`].
fn pad_to(items: &mut Vec<Value>, idx: usize, path: &DocPath) -> Result<()> {
    if idx >= MAX_ARRAY_SIZE {
        return Err(Error::InvalidOperation(format!(
            "index {} at {} exceeds the sequence limit of {} elements",
            idx,
            path.to_path_string(),
            MAX_ARRAY_SIZE
        )));
    }
    items.resize(idx, Value::Null);
    Ok(())
}

/// Step into `current[segment]`, creating an empty mapping when absent
fn descend_or_create<'a>(
    current: &'a mut Value,
    segment: &str,
    path: &DocPath,
) -> Result<&'a mut Value> {
    match current {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let idx = array_index(segment).ok_or_else(|| conflict(path, segment, "array"))?;
            if idx >= items.len() {
                pad_to(items, idx, path)?;
                items.push(Value::Object(Map::new()));
            }
            Ok(&mut items[idx])
        }
        other => Err(conflict(path, segment, type_name(other))),
    }
}

/// Assign `value` at `parent[segment]`
fn assign(parent: &mut Value, segment: &str, value: Value, path: &DocPath) -> Result<()> {
    match parent {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let idx = array_index(segment).ok_or_else(|| conflict(path, segment, "array"))?;
            if idx < items.len() {
                items[idx] = value;
            } else {
                pad_to(items, idx, path)?;
                items.push(value);
            }
            Ok(())
        }
        other => Err(conflict(path, segment, type_name(other))),
    }
}

/// Set `value` at `path`, materializing missing ancestors
///
/// The root path replaces the whole document. Missing intermediate segments
/// are created as empty mappings; a sequence index at or past the end
/// appends, padding any gap with `null`.
///
/// # Errors
///
/// `PathConflict` when an existing ancestor is a scalar, or when a
/// non-index segment addresses a sequence. `InvalidOperation` when an index
/// would grow a sequence past [`MAX_ARRAY_SIZE`]. On error `doc` may already hold
/// freshly created (empty) ancestors, so callers mutate a working copy.
///
/// # Examples
///
/// ```
/// use jstore_core::path::{write_at, DocPath};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// write_at(&mut doc, &DocPath::parse("/foo/bar/5"), json!({"hello": "world"})).unwrap();
/// assert_eq!(doc, json!({"foo": {"bar": {"5": {"hello": "world"}}}}));
/// ```
pub fn write_at(doc: &mut Value, path: &DocPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        *doc = value;
        return Ok(());
    };

    let mut current = doc;
    for segment in parents {
        current = descend_or_create(current, segment, path)?;
    }
    assign(current, last, value, path)
}

// =============================================================================
// Remove
// =============================================================================

/// Step into an existing `current[segment]`
fn descend_existing<'a>(
    current: &'a mut Value,
    segment: &str,
    path: &DocPath,
) -> Result<&'a mut Value> {
    match current {
        Value::Object(map) => map
            .get_mut(segment)
            .ok_or_else(|| Error::not_found(path.to_path_string())),
        Value::Array(items) => array_index(segment)
            .and_then(|i| items.get_mut(i))
            .ok_or_else(|| Error::not_found(path.to_path_string())),
        other => Err(conflict(path, segment, type_name(other))),
    }
}

/// Delete the value at `path` and return it
///
/// Ancestors are never created. Removing a sequence element shifts later
/// elements left.
///
/// # Errors
///
/// - `NotFound` if an ancestor or the target itself is absent
/// - `PathConflict` if an ancestor is a scalar
/// - `InvalidOperation` for the root path
///
/// # Examples
///
/// ```
/// use jstore_core::path::{remove_at, DocPath};
/// use serde_json::json;
///
/// let mut doc = json!({"users": {"13": "B", "15": "A"}});
/// let removed = remove_at(&mut doc, &DocPath::parse("/users/15")).unwrap();
/// assert_eq!(removed, json!("A"));
/// assert_eq!(doc, json!({"users": {"13": "B"}}));
/// ```
pub fn remove_at(doc: &mut Value, path: &DocPath) -> Result<Value> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(Error::InvalidOperation(
            "cannot remove the document root".to_string(),
        ));
    };

    let mut current = doc;
    for segment in parents {
        current = descend_existing(current, segment, path)?;
    }

    match current {
        Value::Object(map) => map
            .shift_remove(last.as_str())
            .ok_or_else(|| Error::not_found(path.to_path_string())),
        Value::Array(items) => match array_index(last) {
            Some(idx) if idx < items.len() => Ok(items.remove(idx)),
            _ => Err(Error::not_found(path.to_path_string())),
        },
        other => Err(conflict(path, last, type_name(other))),
    }
}
