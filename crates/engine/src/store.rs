//! Document store
//!
//! [`Store`] owns one JSON document persisted as text under a single key of a
//! [`Storage`] backend. Every public operation:
//!
//! 1. offers the call to the installed hook, which may short-circuit it
//! 2. reads the persisted document fresh from storage
//! 3. resolves the path and mutates a private copy
//! 4. writes the whole document back in one `Storage::set`
//!
//! A failed mutation never reaches step 4, so no partial document is ever
//! persisted. Steps 2 to 4 run under a per-store write lock, so concurrent
//! mutations from other threads cannot interleave and drop each other's
//! changes. The lock is reentrant: a hook that calls back into the store from
//! inside a composite operation does not deadlock.
//!
//! # Example
//!
//! ```
//! use jstore_engine::Store;
//! use jstore_storage::MemoryStorage;
//! use serde_json::json;
//!
//! let store = Store::open(MemoryStorage::new(), json!({"users": {}})).unwrap();
//! store.set("/users/15", json!({"name": "A", "age": 26})).unwrap();
//! assert_eq!(store.get("/users/15/name", None).unwrap(), json!("A"));
//! assert!(store.exists("/users/15"));
//! assert!(store.post("/users/15", json!({})).unwrap_err().is_duplicate());
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::{debug, info, warn};

use jstore_core::{
    apply_query, is_truthy, read_at, remove_at, values_of, write_at, DocPath, Error, QueryOptions,
    Result, Storage, Value,
};
use jstore_storage::FileStorage;

use crate::config::{StoreConfig, CONFIG_FILE_NAME, DEFAULT_KEY};
use crate::hooks::{HookArgs, Hooks, Operation};

/// Path-addressable JSON document over a storage slot
pub struct Store {
    storage: Arc<dyn Storage>,
    key: String,
    defaults: Value,
    /// Last document this instance seeded, wrote or loaded on open
    data: RwLock<Value>,
    hooks: RwLock<Hooks>,
    /// Held from load through persist by every mutation
    write_lock: ReentrantMutex<()>,
}

/// Builder for a [`Store`] with a non-default key or preinstalled hooks
#[derive(Debug, Default)]
pub struct StoreBuilder {
    key: Option<String>,
    hooks: Hooks,
}

impl StoreBuilder {
    /// Storage key the document lives under
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Hooks installed from the start
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Open the store.
    ///
    /// If the slot is empty and `defaults` is truthy, `defaults` is persisted
    /// immediately. Falsy defaults (`null`, `false`, `0`, `""`) leave the
    /// slot empty so a later open can still seed it. An existing document is
    /// left untouched and `defaults` is kept only for [`Store::reset`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the backend fails.
    pub fn open<S: Storage + 'static>(self, storage: S, defaults: Value) -> Result<Store> {
        let key = self.key.unwrap_or_else(|| DEFAULT_KEY.to_string());
        if key.is_empty() {
            return Err(Error::InvalidOperation(
                "storage key must not be empty".to_string(),
            ));
        }

        let store = Store {
            storage: Arc::new(storage),
            key,
            defaults,
            data: RwLock::new(Value::Null),
            hooks: RwLock::new(self.hooks),
            write_lock: ReentrantMutex::new(()),
        };

        if store.storage.contains(&store.key)? {
            let current = match store.load() {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(target: "jstore::store", key = %store.key, error = %e, "Persisted document failed to decode");
                    Value::Null
                }
            };
            *store.data.write() = current;
        } else if is_truthy(&store.defaults) {
            info!(target: "jstore::store", key = %store.key, "Seeding document from defaults");
            store.persist(store.defaults.clone())?;
        } else {
            debug!(target: "jstore::store", key = %store.key, "Falsy defaults, slot left empty");
        }
        Ok(store)
    }
}

impl Store {
    /// Open a store under the default key
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the empty slot fails.
    pub fn open<S: Storage + 'static>(storage: S, defaults: Value) -> Result<Self> {
        Self::builder().open(storage, defaults)
    }

    /// Open a store with hooks installed
    pub fn with_hooks<S: Storage + 'static>(
        storage: S,
        defaults: Value,
        hooks: Hooks,
    ) -> Result<Self> {
        Self::builder().hooks(hooks).open(storage, defaults)
    }

    /// Open a store using the key from `config`
    pub fn from_config<S: Storage + 'static>(
        storage: S,
        config: &StoreConfig,
        defaults: Value,
    ) -> Result<Self> {
        config.validate()?;
        Self::builder().key(config.key.clone()).open(storage, defaults)
    }

    /// Open a file-backed store in `dir`.
    ///
    /// Creates the directory and a default `jstore.toml` on first use, then
    /// applies that config.
    pub fn open_dir(dir: impl AsRef<Path>, defaults: Value) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        StoreConfig::write_default_if_missing(&config_path)?;
        let config = StoreConfig::from_file(&config_path)?;
        let storage = FileStorage::open(dir)?.with_sync_writes(config.sync_writes);
        Self::from_config(storage, &config, defaults)
    }

    /// Start building a store
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Storage key the document lives under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The construction-time defaults
    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// The document as currently persisted; an empty slot reads as `null`
    pub fn document(&self) -> Result<Value> {
        self.load()
    }

    /// The last document this instance seeded or wrote
    pub fn data(&self) -> Value {
        self.data.read().clone()
    }

    // =========================================================================
    // Hook registration
    // =========================================================================

    /// Install `handler` for `operation`, replacing any previous one
    pub fn on<F>(&self, operation: Operation, handler: F)
    where
        F: Fn(&HookArgs<'_>, &Store) -> Option<Value> + Send + Sync + 'static,
    {
        self.hooks.write().insert(operation, Arc::new(handler));
    }

    /// Remove the handler for `operation`; returns whether one was installed
    pub fn clear_listener(&self, operation: Operation) -> bool {
        self.hooks.write().remove(operation)
    }

    /// A snapshot of the installed hooks
    pub fn hooks(&self) -> Hooks {
        self.hooks.read().clone()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Read the value at `path`, shaped by `options` when given.
    ///
    /// # Errors
    ///
    /// `NotFound` if the path does not resolve.
    pub fn get(&self, path: impl Into<DocPath>, options: Option<&QueryOptions>) -> Result<Value> {
        self.get_in(&self.hooks(), &path.into(), options)
    }

    /// Write `value` at `path`, creating missing ancestors as objects.
    ///
    /// Returns `Some` with the hook response when a hook short-circuited.
    ///
    /// # Errors
    ///
    /// `PathConflict` if an existing ancestor is a scalar, `InvalidOperation`
    /// if an index would grow a sequence past `MAX_ARRAY_SIZE`.
    pub fn set(&self, path: impl Into<DocPath>, value: Value) -> Result<Option<Value>> {
        self.set_in(&self.hooks(), &path.into(), value)
    }

    /// Delete the value at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the path does not exist, `InvalidOperation` for the root.
    pub fn remove(&self, path: impl Into<DocPath>) -> Result<Option<Value>> {
        self.remove_in(&self.hooks(), &path.into())
    }

    /// Insert `value` into the sequence at `path`.
    ///
    /// With `index` the value is inserted there, shifting later elements
    /// right; an index past the end appends. Without `index` it appends. A
    /// mapping at `path` is replaced by the sequence of its values.
    ///
    /// # Errors
    ///
    /// `NotFound` if the path does not exist.
    pub fn add(
        &self,
        path: impl Into<DocPath>,
        value: Value,
        index: Option<usize>,
    ) -> Result<Option<Value>> {
        self.add_in(&self.hooks(), &path.into(), value, index)
    }

    /// Whether `path` resolves to a value. Never fails.
    pub fn exists(&self, path: impl Into<DocPath>) -> bool {
        self.exists_in(&self.hooks(), &path.into())
    }

    /// Like [`Store::set`], but refuses to overwrite.
    ///
    /// # Errors
    ///
    /// `DuplicatePath` if `path` already exists; the document is unchanged.
    pub fn post(&self, path: impl Into<DocPath>, value: Value) -> Result<Option<Value>> {
        self.post_in(&self.hooks(), &path.into(), value)
    }

    /// Replace the document with a fresh copy of the defaults
    pub fn reset(&self) -> Result<Option<Value>> {
        let hooks = self.hooks();
        if let Some(response) = self.intercept(&hooks, &HookArgs::new(Operation::Reset)) {
            return Ok(Some(response));
        }
        let _guard = self.write_lock.lock();
        self.storage.remove(&self.key)?;
        info!(target: "jstore::store", key = %self.key, "Document reset to defaults");
        self.persist(self.defaults.clone())?;
        Ok(None)
    }

    // =========================================================================
    // Hook-scoped implementations
    // =========================================================================

    fn get_in(
        &self,
        hooks: &Hooks,
        path: &DocPath,
        options: Option<&QueryOptions>,
    ) -> Result<Value> {
        let args = HookArgs::new(Operation::Get).path(path).options(options);
        if let Some(response) = self.intercept(hooks, &args) {
            return Ok(response);
        }
        let doc = self.load()?;
        let found = read_at(&doc, path)?;
        Ok(match options {
            Some(options) => apply_query(found, options),
            None => found.clone(),
        })
    }

    fn set_in(&self, hooks: &Hooks, path: &DocPath, value: Value) -> Result<Option<Value>> {
        let args = HookArgs::new(Operation::Set).path(path).value(&value);
        if let Some(response) = self.intercept(hooks, &args) {
            return Ok(Some(response));
        }
        let _guard = self.write_lock.lock();
        if path.is_root() {
            self.persist(value)?;
        } else {
            let mut doc = self.load()?;
            write_at(&mut doc, path, value)?;
            self.persist(doc)?;
        }
        Ok(None)
    }

    fn remove_in(&self, hooks: &Hooks, path: &DocPath) -> Result<Option<Value>> {
        let args = HookArgs::new(Operation::Remove).path(path);
        if let Some(response) = self.intercept(hooks, &args) {
            return Ok(Some(response));
        }
        let _guard = self.write_lock.lock();
        let mut doc = self.load()?;
        remove_at(&mut doc, path)?;
        self.set_in(&hooks.without(Operation::Set), &DocPath::root(), doc)?;
        Ok(None)
    }

    fn add_in(
        &self,
        hooks: &Hooks,
        path: &DocPath,
        value: Value,
        index: Option<usize>,
    ) -> Result<Option<Value>> {
        let args = HookArgs::new(Operation::Add)
            .path(path)
            .value(&value)
            .index(index);
        if let Some(response) = self.intercept(hooks, &args) {
            return Ok(Some(response));
        }
        let _guard = self.write_lock.lock();
        let mut items = values_of(&self.get_in(hooks, path, None)?);
        match index {
            Some(i) => items.insert(i.min(items.len()), value),
            None => items.push(value),
        }
        self.set_in(&hooks.without(Operation::Set), path, Value::Array(items))?;
        Ok(None)
    }

    fn exists_in(&self, hooks: &Hooks, path: &DocPath) -> bool {
        let args = HookArgs::new(Operation::Exists).path(path);
        if self.intercept(hooks, &args).is_some() {
            return true;
        }
        self.get_in(hooks, path, None).is_ok()
    }

    fn post_in(&self, hooks: &Hooks, path: &DocPath, value: Value) -> Result<Option<Value>> {
        let args = HookArgs::new(Operation::Post).path(path).value(&value);
        if let Some(response) = self.intercept(hooks, &args) {
            return Ok(Some(response));
        }
        let _guard = self.write_lock.lock();
        if self.exists_in(hooks, path) {
            return Err(Error::duplicate(path.to_path_string()));
        }
        self.set_in(&hooks.without(Operation::Set), path, value)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn intercept(&self, hooks: &Hooks, args: &HookArgs<'_>) -> Option<Value> {
        let response = hooks.intercept(args, self)?;
        debug!(target: "jstore::store", operation = %args.operation, path = ?args.path.map(DocPath::to_path_string), "Operation short-circuited by hook");
        Some(response)
    }

    fn load(&self) -> Result<Value> {
        match self.storage.get(&self.key)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Value::Null),
        }
    }

    fn persist(&self, doc: Value) -> Result<()> {
        let text = serde_json::to_string(&doc)?;
        self.storage.set(&self.key, &text)?;
        debug!(target: "jstore::store", key = %self.key, bytes = text.len(), "Document persisted");
        *self.data.write() = doc;
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("key", &self.key)
            .field("hooks", &*self.hooks.read())
            .finish_non_exhaustive()
    }
}
