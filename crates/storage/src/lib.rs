//! Storage layer for jstore
//!
//! This crate implements the durable key-value slot behind the document store:
//! - MemoryStorage: FxHashMap behind a `parking_lot::RwLock`, clones share slots
//! - FileStorage: one file per key in a data directory, atomic replace on write
//! - testing: RecordingStorage wrapper that counts writes and injects failures
//!
//! Both backends implement [`jstore_core::Storage`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod memory;
pub mod testing;

pub use file::FileStorage;
pub use memory::MemoryStorage;
