//! Test utilities for the store comprehensive tests
//!
//! Provides store constructors over each backend and shared fixtures.

use jstore::testing::RecordingStorage;
use jstore::{FileStorage, MemoryStorage, Store, Value};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

/// The two-user document used throughout the suite
pub fn users_fixture() -> Value {
    json!({
        "users": {
            "15": {"name": "A", "age": 26},
            "13": {"name": "B", "age": 33}
        },
        "cities": ["Lisbon", "Porto", "Braga"]
    })
}

/// Store over a fresh in-memory slot
pub fn memory_store(defaults: Value) -> Store {
    Store::open(MemoryStorage::new(), defaults).expect("Failed to open memory store")
}

/// Store whose backend traffic can be inspected
pub struct RecordedStore {
    pub storage: Arc<RecordingStorage<MemoryStorage>>,
    pub store: Store,
}

impl RecordedStore {
    /// Open and forget the seeding write
    pub fn new(defaults: Value) -> Self {
        let storage = Arc::new(RecordingStorage::new(MemoryStorage::new()));
        let store = Store::open(Arc::clone(&storage), defaults).expect("Failed to open store");
        storage.reset_counters();
        Self { storage, store }
    }
}

/// File-backed store in a temporary directory
pub struct FileStore {
    pub store: Store,
    pub dir: TempDir,
}

impl FileStore {
    pub fn new(defaults: Value) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Self::open_in(&dir, defaults);
        Self { store, dir }
    }

    /// Open another store over the same directory
    pub fn reopen(&self, defaults: Value) -> Store {
        Self::open_in(&self.dir, defaults)
    }

    fn open_in(dir: &TempDir, defaults: Value) -> Store {
        let storage = FileStorage::open(dir.path())
            .expect("Failed to open file storage")
            .with_sync_writes(false);
        Store::open(storage, defaults).expect("Failed to open file store")
    }
}

/// Assert the persisted document equals `expected`
pub fn assert_document(store: &Store, expected: &Value) {
    let actual = store.document().expect("Failed to read document");
    assert_eq!(&actual, expected, "persisted document mismatch");
}
