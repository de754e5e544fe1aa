//! jstore - path-addressable JSON document store
//!
//! One JSON document is persisted as text under a single key of a durable
//! key-value slot. Slash-delimited paths address locations inside it; reads
//! can filter, sort and limit collections; writes create missing parents.
//!
//! # Quick Start
//!
//! ```
//! use jstore::{MemoryStorage, QueryOptions, Store};
//! use serde_json::json;
//!
//! let store = Store::open(MemoryStorage::new(), json!({"users": {}})).unwrap();
//! store.set("/users/15", json!({"name": "A", "age": 26})).unwrap();
//! store.set("/users/13", json!({"name": "B", "age": 33})).unwrap();
//!
//! let oldest_first = QueryOptions::new().order_by("age").desc();
//! assert_eq!(
//!     store.get("/users", Some(&oldest_first)).unwrap(),
//!     json!([{"name": "B", "age": 33}, {"name": "A", "age": 26}])
//! );
//! ```
//!
//! # Architecture
//!
//! - `jstore-core`: paths, query shaping, errors and the [`Storage`] trait
//! - `jstore-storage`: [`MemoryStorage`] and [`FileStorage`] backends
//! - `jstore-engine`: [`Store`], [`Hooks`], [`StoreConfig`] and [`DeferredStore`]

pub use jstore_core::{
    apply_query, is_truthy, read_at, remove_at, type_name, values_of, write_at, DocPath, Error,
    Predicate, QueryOptions, Result, Storage, Value, MAX_ARRAY_SIZE,
};
pub use jstore_engine::{
    Deferred, DeferredStore, Handler, HookArgs, Hooks, Operation, Store, StoreBuilder,
    StoreConfig, CONFIG_FILE_NAME, DEFAULT_DELAY, DEFAULT_KEY,
};
pub use jstore_storage::{testing, FileStorage, MemoryStorage};
