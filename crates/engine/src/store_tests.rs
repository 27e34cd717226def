// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use skiff_core::StoreConfig;
use tempfile::TempDir;
use yare::parameterized;

#[parameterized(
    plain = { None, "photos/cat.jpg" },
    prefixed = { Some("laptop/"), "laptop/photos/cat.jpg" },
)]
fn content_id_from_root(prefix: Option<&str>, expected: &str) {
    let root = Path::new("/home/user/photos");
    let path = Path::new("/home/user/photos/cat.jpg");
    assert_eq!(content_id(root, path, prefix).unwrap(), expected);
}

#[test]
fn content_id_nested_uses_slashes() {
    let root = Path::new("/data/docs");
    let path = Path::new("/data/docs/2026/q3/report.pdf");
    assert_eq!(
        content_id(root, path, None).unwrap(),
        "docs/2026/q3/report.pdf"
    );
}

#[test]
fn content_id_outside_root_is_none() {
    let root = Path::new("/data/docs");
    assert!(content_id(root, Path::new("/data/other/x"), None).is_none());
}

#[test]
fn content_id_for_picks_containing_watch_dir() {
    let config = SyncConfig {
        watch_dirs: vec![PathBuf::from("/a/one"), PathBuf::from("/b/two")],
        ..SyncConfig::default()
    };
    assert_eq!(
        content_id_for(&config, Path::new("/b/two/f.txt")).unwrap(),
        "two/f.txt"
    );
    assert!(content_id_for(&config, Path::new("/c/three/f.txt")).is_none());
}

fn store(dir: &TempDir) -> DirStore {
    DirStore::open(dir.path(), "space").unwrap()
}

fn write_local(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn put_then_list_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let local = write_local(&dir, "cat.jpg", "meow");

    store.put(&local, "photos/cat.jpg").unwrap();

    assert_eq!(store.list().unwrap(), vec!["photos/cat.jpg".to_string()]);
    let stored = dir.path().join("space/photos/cat.jpg");
    assert_eq!(std::fs::read_to_string(stored).unwrap(), "meow");
}

#[test]
fn put_replaces_existing_content() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let v1 = write_local(&dir, "v1", "one");
    let v2 = write_local(&dir, "v2", "two");

    store.put(&v1, "doc").unwrap();
    store.put(&v2, "doc").unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("space/doc")).unwrap(),
        "two"
    );
}

#[test]
fn delete_removes_content_and_tolerates_absent_ids() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let local = write_local(&dir, "f", "data");
    store.put(&local, "f").unwrap();

    store.delete("f").unwrap();
    assert!(store.list().unwrap().is_empty());

    store.delete("f").unwrap();
    store.delete("never/existed").unwrap();
}

#[test]
fn copy_duplicates_content() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let local = write_local(&dir, "f", "data");
    store.put(&local, "doc").unwrap();

    store.copy("doc", "doc.bak").unwrap();

    let mut ids = store.list().unwrap();
    ids.sort();
    assert_eq!(ids, vec!["doc".to_string(), "doc.bak".to_string()]);
}

#[test]
fn connector_without_store_config_fails() {
    let connector = DirStoreConnector::new(None);
    let err = connector.connect().unwrap_err();
    assert!(matches!(err, skiff_core::Error::ConfigIncomplete(_)));
}

#[test]
fn connector_creates_space_directory() {
    let dir = TempDir::new().unwrap();
    let connector = DirStoreConnector::new(Some(StoreConfig {
        target: dir.path().join("store"),
        space_id: "docs".to_string(),
        prefix: None,
    }));

    let handle = connector.connect().unwrap();
    assert!(dir.path().join("store/docs").is_dir());
    assert!(handle.list().unwrap().is_empty());
}
