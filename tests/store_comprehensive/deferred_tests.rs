//! Deferred Facade Tests (Tier 2)
//!
//! Tests the delay-scheduled async facade with a paused tokio clock:
//! - No call runs before its delay elapses
//! - Results and errors pass through unchanged
//! - Pending calls are independent and unordered
//! - Calls racing on a multi-thread runtime never lose a write

use crate::test_utils::{memory_store, users_fixture};
use jstore::{DeferredStore, Error, StoreConfig, DEFAULT_DELAY};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn facade() -> DeferredStore {
    DeferredStore::new(Arc::new(memory_store(users_fixture())))
}

#[tokio::test(start_paused = true)]
async fn test_post_on_existing_path_rejects_after_delay() {
    let deferred = facade();
    let start = Instant::now();

    let err = deferred.post("/cities", json!("foo")).await.unwrap_err();

    assert!(matches!(err, Error::DuplicatePath { ref path } if path == "/cities"));
    assert!(start.elapsed() >= DEFAULT_DELAY);
    assert_eq!(deferred.store().document().unwrap(), users_fixture());
}

#[tokio::test(start_paused = true)]
async fn test_results_pass_through() {
    let deferred = facade();
    assert_eq!(
        deferred.get("/users/13/name", None).await.unwrap(),
        json!("B")
    );
    assert!(deferred.exists("/cities/0").await.unwrap());
    assert!(!deferred.exists("/cities/9").await.unwrap());
    assert!(deferred
        .remove("/nope")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test(start_paused = true)]
async fn test_no_call_runs_before_delay() {
    let deferred = facade();
    let set = deferred.set("/late", json!(1));
    let add = deferred.add("/cities", json!("Faro"), None);

    tokio::time::sleep(DEFAULT_DELAY / 2).await;
    assert!(!deferred.store().exists("/late"));
    assert_eq!(
        deferred.store().get("/cities", None).unwrap(),
        json!(["Lisbon", "Porto", "Braga"])
    );

    set.await.unwrap();
    add.await.unwrap();
    assert!(deferred.store().exists("/late"));
    assert_eq!(
        deferred.store().get("/cities/3", None).unwrap(),
        json!("Faro")
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_calls_all_complete() {
    let deferred = facade();
    let pending: Vec<_> = (0..10)
        .map(|i| deferred.set(format!("/counters/{}", i), json!(i)))
        .collect();

    let start = Instant::now();
    for call in pending {
        call.await.unwrap();
    }
    // All calls share one delay window; they do not queue behind each other.
    assert!(start.elapsed() < DEFAULT_DELAY * 2);

    let counters = deferred.store().get("/counters", None).unwrap();
    assert_eq!(counters.as_object().map(|m| m.len()), Some(10));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_parallel_calls_keep_every_write() {
    let store = Arc::new(memory_store(users_fixture()));
    let deferred = DeferredStore::with_delay(store, Duration::from_millis(5));
    let sets: Vec<_> = (0..400)
        .map(|i| deferred.set(format!("/counters/{}", i), json!(i)))
        .collect();
    let adds: Vec<_> = (0..100)
        .map(|i| deferred.add("/cities", json!(i), None))
        .collect();

    for call in sets.into_iter().chain(adds) {
        call.await.unwrap();
    }

    let counters = deferred.store().get("/counters", None).unwrap();
    assert_eq!(counters.as_object().map(|m| m.len()), Some(400));
    let cities = deferred.store().get("/cities", None).unwrap();
    assert_eq!(cities.as_array().map(Vec::len), Some(103));
}

#[tokio::test(start_paused = true)]
async fn test_serialized_calls_observe_each_other() {
    let deferred = facade();
    deferred.set("/step", json!(1)).await.unwrap();
    let step = deferred.get("/step", None).await.unwrap();
    deferred.set("/step", json!(step.as_i64().unwrap_or(0) + 1)).await.unwrap();
    assert_eq!(deferred.get("/step", None).await.unwrap(), json!(2));
}

#[tokio::test(start_paused = true)]
async fn test_delay_from_config() {
    let config = StoreConfig {
        delay_ms: 250,
        ..StoreConfig::default()
    };
    let deferred = DeferredStore::from_config(Arc::new(memory_store(json!({}))), &config);

    let start = Instant::now();
    deferred.reset().await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(250));
    assert!(elapsed < DEFAULT_DELAY);
}
