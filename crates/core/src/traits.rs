//! Core trait for the durable key-value slot
//!
//! The document store persists its whole document as text under one fixed
//! key. This trait is the only thing the store needs from the backend, which
//! keeps the backend swappable (in-memory for tests, file-backed on disk).

use std::sync::Arc;

use crate::error::Result;

/// Durable string slots addressed by key
///
/// Thread safety: implementations must be safe to call from multiple threads
/// (requires Send + Sync). No coordination between concurrent writers is
/// expected; the last write wins.
///
/// # Examples
///
/// ```
/// use jstore_core::{Result, Storage};
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct MapStorage(Mutex<HashMap<String, String>>);
///
/// impl Storage for MapStorage {
///     fn get(&self, key: &str) -> Result<Option<String>> {
///         Ok(self.0.lock().unwrap().get(key).cloned())
///     }
///     fn set(&self, key: &str, text: &str) -> Result<()> {
///         self.0.lock().unwrap().insert(key.to_string(), text.to_string());
///         Ok(())
///     }
///     fn remove(&self, key: &str) -> Result<()> {
///         self.0.lock().unwrap().remove(key);
///         Ok(())
///     }
/// }
///
/// let storage = MapStorage::default();
/// storage.set("k", "{}").unwrap();
/// assert_eq!(storage.get("k").unwrap().as_deref(), Some("{}"));
/// ```
pub trait Storage: Send + Sync {
    /// Read the text stored under `key`, or `None` if the slot is empty
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the text stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, text: &str) -> Result<()>;

    /// Empty the slot under `key`; removing an empty slot is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether the slot under `key` holds text
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, text: &str) -> Result<()> {
        (**self).set(key, text)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
