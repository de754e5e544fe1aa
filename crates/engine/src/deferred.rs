//! Delay-scheduled async facade over a [`Store`]
//!
//! Every operation of [`DeferredStore`] spawns an independent tokio task that
//! sleeps for the configured delay, then runs the synchronous call on the
//! blocking pool. The
//! returned [`Deferred`] resolves with the call's result or rejects with its
//! error, unchanged.
//!
//! There is no batching and no ordering between pending calls: two calls
//! race, so await one before issuing the next if order matters. Dropping a
//! [`Deferred`] does not cancel the scheduled work.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use jstore_engine::{DeferredStore, Store};
//! use jstore_storage::MemoryStorage;
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Store::open(MemoryStorage::new(), json!({"cities": []})).unwrap();
//! let deferred = DeferredStore::with_delay(Arc::new(store), Duration::from_millis(1));
//!
//! let err = deferred.post("/cities", json!("foo")).await.unwrap_err();
//! assert!(err.is_duplicate());
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use jstore_core::{DocPath, Error, QueryOptions, Result, Value};

use crate::config::{StoreConfig, DEFAULT_DELAY_MS};
use crate::store::Store;

/// Delay used by [`DeferredStore::new`]
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DELAY_MS);

/// Async facade that runs each store call after a fixed delay
#[derive(Debug, Clone)]
pub struct DeferredStore {
    store: Arc<Store>,
    delay: Duration,
}

impl DeferredStore {
    /// Wrap `store` with the default delay
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_delay(store, DEFAULT_DELAY)
    }

    /// Wrap `store` with a custom delay
    pub fn with_delay(store: Arc<Store>, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Wrap `store` with the delay from `config`
    pub fn from_config(store: Arc<Store>, config: &StoreConfig) -> Self {
        Self::with_delay(store, config.delay())
    }

    /// The wrapped store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Delay before each call runs
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Deferred [`Store::get`]
    pub fn get(&self, path: impl Into<DocPath>, options: Option<QueryOptions>) -> Deferred<Value> {
        let path = path.into();
        self.schedule("get", move |store| store.get(path, options.as_ref()))
    }

    /// Deferred [`Store::set`]
    pub fn set(&self, path: impl Into<DocPath>, value: Value) -> Deferred<Option<Value>> {
        let path = path.into();
        self.schedule("set", move |store| store.set(path, value))
    }

    /// Deferred [`Store::remove`]
    pub fn remove(&self, path: impl Into<DocPath>) -> Deferred<Option<Value>> {
        let path = path.into();
        self.schedule("remove", move |store| store.remove(path))
    }

    /// Deferred [`Store::add`]
    pub fn add(
        &self,
        path: impl Into<DocPath>,
        value: Value,
        index: Option<usize>,
    ) -> Deferred<Option<Value>> {
        let path = path.into();
        self.schedule("add", move |store| store.add(path, value, index))
    }

    /// Deferred [`Store::exists`]
    pub fn exists(&self, path: impl Into<DocPath>) -> Deferred<bool> {
        let path = path.into();
        self.schedule("exists", move |store| Ok(store.exists(path)))
    }

    /// Deferred [`Store::post`]
    pub fn post(&self, path: impl Into<DocPath>, value: Value) -> Deferred<Option<Value>> {
        let path = path.into();
        self.schedule("post", move |store| store.post(path, value))
    }

    /// Deferred [`Store::reset`]
    pub fn reset(&self) -> Deferred<Option<Value>> {
        self.schedule("reset", |store| store.reset())
    }

    fn schedule<T, F>(&self, operation: &'static str, call: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                return Deferred::failed(Error::Scheduler(format!(
                    "no tokio runtime to schedule '{}': {}",
                    operation, e
                )))
            }
        };

        let store = Arc::clone(&self.store);
        let delay = self.delay;
        debug!(target: "jstore::deferred", operation, delay_ms = delay.as_millis() as u64, "Deferred call scheduled");

        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Storage may fsync, so the call runs off the async workers
            let result = match tokio::task::spawn_blocking(move || call(&store)).await {
                Ok(result) => result,
                Err(e) => Err(Error::Scheduler(format!(
                    "deferred '{}' call did not complete: {}",
                    operation, e
                ))),
            };
            if let Err(e) = &result {
                debug!(target: "jstore::deferred", operation, error = %e, "Deferred call rejected");
            }
            result
        });
        Deferred::scheduled(task)
    }
}

/// Pending result of a [`DeferredStore`] call
#[must_use = "a Deferred does nothing observable unless awaited"]
#[derive(Debug)]
pub struct Deferred<T> {
    state: State<T>,
}

#[derive(Debug)]
enum State<T> {
    Scheduled(JoinHandle<Result<T>>),
    Failed(Option<Error>),
}

impl<T> Deferred<T> {
    fn scheduled(task: JoinHandle<Result<T>>) -> Self {
        Self {
            state: State::Scheduled(task),
        }
    }

    fn failed(error: Error) -> Self {
        Self {
            state: State::Failed(Some(error)),
        }
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Scheduled(task) => match Pin::new(task).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) => Poll::Ready(Err(Error::Scheduler(format!(
                    "deferred call did not complete: {}",
                    e
                )))),
                Poll::Pending => Poll::Pending,
            },
            State::Failed(error) => Poll::Ready(Err(error.take().unwrap_or_else(|| {
                Error::Scheduler("deferred call polled after completion".to_string())
            }))),
        }
    }
}
