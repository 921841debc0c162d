// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn file_store_round_trips_a_cursor() {
    let dir = tempdir().unwrap();
    let store = FileCheckpointStore::new(dir.path());

    assert_eq!(store.load("github").unwrap(), None);

    store.save("github", json!({ "since": "2026-07-28T00:00:00Z" })).unwrap();
    let loaded = store.load("github").unwrap();
    assert_eq!(loaded, Some(json!({ "since": "2026-07-28T00:00:00Z" })));
}

#[test]
fn file_store_separates_cursors_by_source_id() {
    let dir = tempdir().unwrap();
    let store = FileCheckpointStore::new(dir.path());

    store.save("github", json!({ "page": 1 })).unwrap();
    store.save("jira", json!({ "page": 9 })).unwrap();

    assert_eq!(store.load("github").unwrap(), Some(json!({ "page": 1 })));
    assert_eq!(store.load("jira").unwrap(), Some(json!({ "page": 9 })));
}

#[test]
fn file_store_clear_removes_the_cursor() {
    let dir = tempdir().unwrap();
    let store = FileCheckpointStore::new(dir.path());
    store.save("github", json!({ "page": 1 })).unwrap();
    store.clear("github").unwrap();
    assert_eq!(store.load("github").unwrap(), None);
}

#[test]
fn memory_store_round_trips_a_cursor() {
    let store = MemoryCheckpointStore::new();
    assert_eq!(store.load("github").unwrap(), None);
    store.save("github", json!({ "page": 2 })).unwrap();
    assert_eq!(store.load("github").unwrap(), Some(json!({ "page": 2 })));
}

#[test]
fn memory_store_clear_removes_the_cursor() {
    let store = MemoryCheckpointStore::new();
    store.save("github", json!({ "page": 2 })).unwrap();
    store.clear("github").unwrap();
    assert_eq!(store.load("github").unwrap(), None);
}
