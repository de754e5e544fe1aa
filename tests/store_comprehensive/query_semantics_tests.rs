//! Query Semantics Tests (Tier 1)
//!
//! Tests read-time shaping through `Store::get`:
//! - where → limit → orderBy → asc → desc application order
//! - Results are sequences of values; no options returns the raw value
//! - Sort overlap and type-partitioned raw-value ordering

use crate::test_utils::{memory_store, users_fixture};
use jstore::QueryOptions;
use serde_json::{json, Value};

fn scores() -> Value {
    json!({
        "people": {
            "b": {"name": "Bea", "score": 7},
            "a": {"name": "Al", "score": 3},
            "c": {"name": "Cy", "score": 9},
            "d": {"name": "Di", "score": 5}
        },
        "mixed": ["pear", 3, "apple", 1]
    })
}

// =============================================================================
// Ordering by property
// =============================================================================

#[test]
fn test_order_by_desc_on_users() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().order_by("age").desc();
    assert_eq!(
        store.get("/users", Some(&options)).unwrap(),
        json!([{"name": "B", "age": 33}, {"name": "A", "age": 26}])
    );
}

#[test]
fn test_order_by_defaults_to_ascending() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().order_by("age");
    assert_eq!(
        store.get("/users", Some(&options)).unwrap(),
        json!([{"name": "A", "age": 26}, {"name": "B", "age": 33}])
    );
}

// =============================================================================
// Shape
// =============================================================================

#[test]
fn test_no_options_returns_raw_value() {
    let store = memory_store(users_fixture());
    let raw = store.get("/users", None).unwrap();
    assert!(raw.is_object());
    assert_eq!(store.get("/users", Some(&QueryOptions::new())).unwrap(), raw);
}

#[test]
fn test_options_collect_values() {
    let store = memory_store(scores());
    let options = QueryOptions::new().limit(10);
    let result = store.get("/people", Some(&options)).unwrap();
    assert_eq!(
        result,
        json!([
            {"name": "Bea", "score": 7},
            {"name": "Al", "score": 3},
            {"name": "Cy", "score": 9},
            {"name": "Di", "score": 5}
        ])
    );
}

#[test]
fn test_options_from_json_ignore_unknown_keys() {
    let store = memory_store(scores());
    let options = QueryOptions::from_json(&json!({"orderBy": "score", "limit": 3, "page": 2}));
    let names: Vec<Value> = store
        .get("/people", Some(&options))
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Al"), json!("Bea"), json!("Cy")]);
}

// =============================================================================
// Application order
// =============================================================================

#[test]
fn test_where_sees_enumeration_index() {
    let store = memory_store(scores());
    let options = QueryOptions::new().filter(|_, index| index % 2 == 0);
    assert_eq!(
        store.get("/people", Some(&options)).unwrap(),
        json!([{"name": "Bea", "score": 7}, {"name": "Cy", "score": 9}])
    );
}

#[test]
fn test_limit_applies_before_sort() {
    let store = memory_store(scores());
    // First two enumerated are Bea(7) and Al(3); the 9 never makes it to the sort.
    let options = QueryOptions::new().limit(2).order_by("score").desc();
    assert_eq!(
        store.get("/people", Some(&options)).unwrap(),
        json!([{"name": "Bea", "score": 7}, {"name": "Al", "score": 3}])
    );
}

#[test]
fn test_where_then_limit() {
    let store = memory_store(scores());
    let options = QueryOptions::new()
        .filter(|person, _| person["score"].as_i64().unwrap_or(0) > 4)
        .limit(2);
    assert_eq!(
        store.get("/people", Some(&options)).unwrap(),
        json!([{"name": "Bea", "score": 7}, {"name": "Cy", "score": 9}])
    );
}

#[test]
fn test_non_positive_limit_empties() {
    let store = memory_store(scores());
    for n in [0, -3] {
        let options = QueryOptions::new().limit(n);
        assert_eq!(store.get("/people", Some(&options)).unwrap(), json!([]));
    }
}

#[test]
fn test_where_eq() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().where_eq("name", json!("A"));
    assert_eq!(
        store.get("/users", Some(&options)).unwrap(),
        json!([{"name": "A", "age": 26}])
    );
}

// =============================================================================
// Raw-value sorts
// =============================================================================

#[test]
fn test_asc_on_strings() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().asc();
    assert_eq!(
        store.get("/cities", Some(&options)).unwrap(),
        json!(["Braga", "Lisbon", "Porto"])
    );
}

#[test]
fn test_desc_on_strings() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().desc();
    assert_eq!(
        store.get("/cities", Some(&options)).unwrap(),
        json!(["Porto", "Lisbon", "Braga"])
    );
}

#[test]
fn test_desc_overrides_asc() {
    let store = memory_store(users_fixture());
    let options = QueryOptions::new().asc().desc();
    assert_eq!(
        store.get("/cities", Some(&options)).unwrap(),
        json!(["Porto", "Lisbon", "Braga"])
    );
}

#[test]
fn test_raw_sorts_partition_by_type() {
    // Non-strings take the opposite direction of strings.
    let store = memory_store(json!({"n": [1, 3, 2]}));
    let asc = QueryOptions::new().asc();
    let desc = QueryOptions::new().desc();
    assert_eq!(store.get("/n", Some(&asc)).unwrap(), json!([3, 2, 1]));
    assert_eq!(store.get("/n", Some(&desc)).unwrap(), json!([1, 2, 3]));
}

#[test]
fn test_asc_overrides_order_by() {
    let store = memory_store(json!({"n": [1, 3, 2]}));
    let options = QueryOptions::new().order_by("k").asc();
    assert_eq!(
        store.get("/n", Some(&options)).unwrap(),
        store.get("/n", Some(&QueryOptions::new().asc())).unwrap()
    );
}

#[test]
fn test_sort_never_panics_on_mixed_values() {
    let store = memory_store(scores());
    for options in [
        QueryOptions::new().asc(),
        QueryOptions::new().desc(),
        QueryOptions::new().order_by("missing"),
    ] {
        let result = store.get("/mixed", Some(&options)).unwrap();
        assert_eq!(result.as_array().map(Vec::len), Some(4));
    }
}
