//! Persistence Tests (Tier 2)
//!
//! Tests the store against file-backed slots:
//! - Seeding is one-shot across reopen
//! - Every mutation is visible to a fresh store over the same directory
//! - Reset survives reopen
//! - Backend failures never leave a partial document

use crate::test_utils::{assert_document, users_fixture, FileStore, RecordedStore};
use jstore::{Error, FileStorage, Storage, Store, DEFAULT_KEY};
use serde_json::json;

#[test]
fn test_seeding_is_one_shot() {
    let fs = FileStore::new(users_fixture());
    fs.store.set("/users/15/age", json!(27)).unwrap();

    let reopened = fs.reopen(json!({"other": "defaults"}));
    assert_eq!(reopened.get("/users/15/age", None).unwrap(), json!(27));
    assert!(!reopened.exists("/other"));
    assert_eq!(reopened.defaults(), &json!({"other": "defaults"}));
}

#[test]
fn test_mutations_visible_after_reopen() {
    let fs = FileStore::new(users_fixture());
    fs.store.set("/countries/pt", json!("Portugal")).unwrap();
    fs.store.add("/cities", json!("Faro"), Some(0)).unwrap();
    fs.store.remove("/users/13").unwrap();
    fs.store.post("/version", json!(2)).unwrap();

    let reopened = fs.reopen(json!({}));
    assert_document(
        &reopened,
        &json!({
            "users": {"15": {"name": "A", "age": 26}},
            "cities": ["Faro", "Lisbon", "Porto", "Braga"],
            "countries": {"pt": "Portugal"},
            "version": 2
        }),
    );
}

#[test]
fn test_reset_discards_writes_and_survives_reopen() {
    let fs = FileStore::new(users_fixture());
    fs.store.set("/", json!({"replaced": true})).unwrap();
    fs.store.reset().unwrap();
    assert_document(&fs.store, &users_fixture());

    let reopened = fs.reopen(json!({"ignored": 1}));
    assert_document(&reopened, &users_fixture());
}

#[test]
fn test_document_is_plain_json_on_disk() {
    let fs = FileStore::new(json!({"a": [1, 2]}));
    let storage = FileStorage::open(fs.dir.path()).unwrap();
    let text = storage.get(DEFAULT_KEY).unwrap().unwrap();
    assert_eq!(text, r#"{"a":[1,2]}"#);
}

#[test]
fn test_get_rereads_external_changes() {
    let fs = FileStore::new(json!({"v": 1}));
    let storage = FileStorage::open(fs.dir.path()).unwrap();
    storage.set(DEFAULT_KEY, r#"{"v":2}"#).unwrap();

    assert_eq!(fs.store.get("/v", None).unwrap(), json!(2));
    // The mirror only tracks this instance's own writes.
    assert_eq!(fs.store.data(), json!({"v": 1}));
}

#[test]
fn test_failed_write_keeps_previous_document() {
    let recorded = RecordedStore::new(users_fixture());
    recorded.storage.fail_writes(true);

    let err = recorded.store.set("/users/15/age", json!(99)).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(recorded.store.add("/cities", json!("x"), None).is_err());

    recorded.storage.fail_writes(false);
    assert_document(&recorded.store, &users_fixture());
    assert_eq!(recorded.store.data(), users_fixture());
}

#[test]
fn test_each_mutation_is_one_write() {
    let recorded = RecordedStore::new(users_fixture());
    recorded.store.set("/a", json!(1)).unwrap();
    recorded.store.add("/cities", json!("x"), None).unwrap();
    recorded.store.post("/b", json!(2)).unwrap();
    recorded.store.remove("/a").unwrap();
    assert_eq!(recorded.storage.writes(), 4);

    recorded.store.get("/", None).unwrap();
    recorded.store.exists("/b");
    assert_eq!(recorded.storage.writes(), 4);
}

#[test]
fn test_reset_empties_slot_before_writing_defaults() {
    let recorded = RecordedStore::new(users_fixture());
    recorded.store.reset().unwrap();
    assert_eq!(recorded.storage.removes(), 1);
    assert_eq!(recorded.storage.writes(), 1);
}

#[test]
fn test_corrupt_slot_is_reported_on_read() {
    let fs = FileStore::new(json!({}));
    let storage = FileStorage::open(fs.dir.path()).unwrap();
    storage.set(DEFAULT_KEY, "{truncated").unwrap();

    let reopened: Store = fs.reopen(json!({}));
    assert!(matches!(reopened.get("/", None), Err(Error::Serialization(_))));
    assert!(!reopened.exists("/"));

    reopened.reset().unwrap();
    assert_document(&reopened, &json!({}));
}
