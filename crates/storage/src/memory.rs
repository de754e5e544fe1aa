//! MemoryStorage: in-process slot map
//!
//! Uses:
//! - `FxHashMap<String, String>` for the slots
//! - `parking_lot::RwLock` for thread-safe access
//!
//! Cloning a `MemoryStorage` shares the underlying slots, so several stores
//! can be opened over one set of slots in tests.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use jstore_core::{Result, Storage};

/// In-memory storage backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// True when no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Drop every slot
    pub fn clear(&self) {
        self.slots.write().clear();
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, text: &str) -> Result<()> {
        self.slots.write().insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots.write().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.slots.read().contains_key(key))
    }
}
