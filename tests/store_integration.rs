//! Vector store persistence across open/close cycles.

use densegroup::io::VectorStore;
use densegroup::{Item, StoreError};
use std::fs;
use tempfile::TempDir;

fn sample(id: &str, x: f64) -> Item {
    Item::new(id, format!("Item {id}"), vec![x, x + 1.0, x + 2.0])
}

#[test]
fn items_survive_close_and_reopen() {
    let dir = TempDir::new().unwrap();

    let mut store = VectorStore::open(dir.path(), "people").unwrap();
    store
        .add(vec![sample("a", 0.0), sample("b", 1.5), sample("c", -2.25)])
        .unwrap();
    assert!(store.is_dirty());
    store.close().unwrap();

    let store = VectorStore::open(dir.path(), "people").unwrap();
    assert_eq!(store.count(), 3);
    assert_eq!(store.items()[1], sample("b", 1.5));
    assert_eq!(store.dimensions(), Some(3));
    assert!(!store.is_dirty());
    store.close().unwrap();
}

#[test]
fn collections_are_separate_files() {
    let dir = TempDir::new().unwrap();

    let mut first = VectorStore::open(dir.path(), "first").unwrap();
    first.add(vec![sample("a", 0.0)]).unwrap();
    first.close().unwrap();

    let second = VectorStore::open(dir.path(), "second").unwrap();
    assert!(second.is_empty());
    second.close().unwrap();

    assert!(dir.path().join("first.jsonl").exists());
    assert!(dir.path().join("second.jsonl").exists());
}

#[test]
fn unsaved_changes_are_lost_on_drop() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = VectorStore::open(dir.path(), "c").unwrap();
        store.add(vec![sample("a", 0.0)]).unwrap();
    }
    let store = VectorStore::open(dir.path(), "c").unwrap();
    assert!(store.is_empty());
}

#[test]
fn clear_persists_after_close() {
    let dir = TempDir::new().unwrap();
    let mut store = VectorStore::open(dir.path(), "c").unwrap();
    store.add(vec![sample("a", 0.0), sample("b", 1.0)]).unwrap();
    store.flush().unwrap();

    store.clear();
    assert!(store.is_empty());
    store.close().unwrap();

    let reopened = VectorStore::open(dir.path(), "c").unwrap();
    assert_eq!(reopened.count(), 0);
    assert_eq!(fs::read_to_string(reopened.path()).unwrap(), "");
}

#[test]
fn stored_duplicates_are_rejected_on_open() {
    let dir = TempDir::new().unwrap();
    let line = serde_json::to_string(&sample("a", 0.0)).unwrap();
    fs::write(dir.path().join("c.jsonl"), format!("{line}\n{line}\n")).unwrap();

    let err = VectorStore::open(dir.path(), "c").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "a"));
}

#[test]
fn flush_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let mut store = VectorStore::open(dir.path(), "c").unwrap();
    store.add(vec![sample("a", 0.0)]).unwrap();
    store.close().unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["c.jsonl".to_string()]);
}
