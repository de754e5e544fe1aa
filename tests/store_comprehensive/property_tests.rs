//! Property Tests (Tier 3)
//!
//! proptest-driven checks of the store's algebraic properties:
//! - set then get round-trips
//! - set is idempotent
//! - reset restores defaults regardless of intervening writes
//! - add with an index inserts at that position

use crate::test_utils::memory_store;
use jstore::QueryOptions;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Object keys that never collide with sequence indices or blank segments
fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(segment(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn join(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_set_then_get_round_trips(segments in path(), value in json_value()) {
        let store = memory_store(json!({}));
        let path = join(&segments);
        store.set(path.as_str(), value.clone()).unwrap();
        prop_assert_eq!(store.get(path.as_str(), None).unwrap(), value);
    }

    #[test]
    fn prop_set_is_idempotent(segments in path(), value in json_value(), seed in json_value()) {
        let store = memory_store(json!({"seed": seed}));
        let path = format!("/data{}", join(&segments));
        store.set(path.as_str(), value.clone()).unwrap();
        let once = store.document().unwrap();
        store.set(path.as_str(), value).unwrap();
        prop_assert_eq!(store.document().unwrap(), once);
    }

    #[test]
    fn prop_reset_restores_defaults(
        defaults in json_value(),
        writes in prop::collection::vec((path(), json_value()), 0..6),
    ) {
        let store = memory_store(defaults.clone());
        for (segments, value) in writes {
            // Writes through scalars may conflict; reset must not care.
            let _ = store.set(join(&segments), value);
        }
        store.reset().unwrap();
        prop_assert_eq!(store.get("/", None).unwrap(), defaults);
    }

    #[test]
    fn prop_add_inserts_at_index(
        items in prop::collection::vec(any::<i32>(), 0..8),
        value in any::<i32>(),
        index in 0usize..10,
    ) {
        let store = memory_store(json!({"list": items.clone()}));
        store.add("/list", json!(value), Some(index)).unwrap();

        let mut expected = items.clone();
        expected.insert(index.min(items.len()), value);
        prop_assert_eq!(store.get("/list", None).unwrap(), json!(expected));
    }

    #[test]
    fn prop_add_without_index_appends(
        items in prop::collection::vec(any::<i32>(), 0..8),
        value in any::<i32>(),
    ) {
        let store = memory_store(json!({"list": items}));
        store.add("/list", json!(value), None).unwrap();
        let list = store.get("/list", None).unwrap();
        let expected = json!(value);
        prop_assert_eq!(list.as_array().and_then(|l| l.last()), Some(&expected));
    }

    #[test]
    fn prop_limit_never_grows(
        items in prop::collection::vec(any::<i32>(), 0..12),
        limit in -3i64..20,
    ) {
        let store = memory_store(json!({"list": items.clone()}));
        let options = QueryOptions::new().limit(limit);
        let result = store.get("/list", Some(&options)).unwrap();
        let len = result.as_array().map(Vec::len).unwrap_or(0);
        prop_assert_eq!(len, items.len().min(limit.max(0) as usize));
    }
}
