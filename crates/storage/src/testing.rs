//! Testing utilities for code built on the storage slot
//!
//! [`RecordingStorage`] wraps any backend and:
//! - counts reads, writes and removes
//! - keeps a log of every text written
//! - can be armed to fail writes, for partial-write and error-path tests
//!
//! # Example
//!
//! ```
//! use jstore_core::Storage;
//! use jstore_storage::{testing::RecordingStorage, MemoryStorage};
//!
//! let storage = RecordingStorage::new(MemoryStorage::new());
//! storage.set("k", "1").unwrap();
//! assert_eq!(storage.writes(), 1);
//!
//! storage.fail_writes(true);
//! assert!(storage.set("k", "2").is_err());
//! assert_eq!(storage.get("k").unwrap().as_deref(), Some("1"));
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use jstore_core::{Error, Result, Storage};

/// Storage wrapper that records traffic and can inject write failures
#[derive(Debug, Default)]
pub struct RecordingStorage<S> {
    inner: S,
    reads: AtomicUsize,
    writes: AtomicUsize,
    removes: AtomicUsize,
    failing: AtomicBool,
    written: Mutex<Vec<String>>,
}

impl<S: Storage> RecordingStorage<S> {
    /// Wrap a backend
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            written: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped backend
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Make subsequent `set`/`remove` calls fail (or succeed again)
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful `get` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Successful `remove` calls so far
    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    /// Every text passed to a successful `set`, oldest first
    pub fn written(&self) -> Vec<String> {
        self.written.lock().clone()
    }

    /// Zero all counters and forget the write log
    pub fn reset_counters(&self) {
        self.reads.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
        self.removes.store(0, Ordering::SeqCst);
        self.written.lock().clear();
    }

    fn check_writable(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Storage("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl<S: Storage> Storage for RecordingStorage<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let text = self.inner.get(key)?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(text)
    }

    fn set(&self, key: &str, text: &str) -> Result<()> {
        self.check_writable()?;
        self.inner.set(key, text)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.written.lock().push(text.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.inner.remove(key)?;
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.inner.contains(key)
    }
}
