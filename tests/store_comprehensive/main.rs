//! Store Comprehensive Test Suite
//!
//! Exercises the public `jstore` API end to end: path resolution, query
//! shaping, hooks, persistence across reopen and the deferred facade.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Core Semantics** (fast, must pass)
//!   Path materialization, removal, query ordering, hook short-circuit.
//!
//! - **Tier 2: Behavioral Scenarios**
//!   File-backed persistence and the deferred facade.
//!
//! - **Tier 3: Properties**
//!   proptest round-trip, idempotence and reset properties.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_comprehensive
//! ```

// Test utilities
mod test_utils;

mod query_semantics_tests;

// Tier 2: Behavioral Scenarios
mod deferred_tests;
mod persistence_tests;

// Tier 3: Properties
mod property_tests;
