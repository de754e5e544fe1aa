//! Document store engine for jstore
//!
//! This crate turns the pure path and query functions of `jstore-core` into a
//! persistent store:
//! - [`Store`]: one JSON document over a storage slot, with
//!   get/set/remove/add/exists/post/reset
//! - [`Hooks`]: per-operation interception that can short-circuit a call
//! - [`StoreConfig`]: `jstore.toml` settings for a data directory
//! - [`DeferredStore`]: every store operation as a delayed tokio task

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod deferred;
pub mod hooks;
pub mod store;

pub use config::{StoreConfig, CONFIG_FILE_NAME, DEFAULT_KEY};
pub use deferred::{Deferred, DeferredStore, DEFAULT_DELAY};
pub use hooks::{Handler, HookArgs, Hooks, Operation};
pub use store::{Store, StoreBuilder};
