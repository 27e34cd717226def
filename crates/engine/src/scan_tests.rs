// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use skiff_core::ChangeQueue;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn wait_until(what: &str, check: impl Fn() -> bool) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while std::time::Instant::now() < deadline {
        if check() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("timed out waiting for {what}");
}

#[test]
fn fingerprint_hashes_small_files() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "small.txt", "hello");
    let fp = fingerprint(&path).unwrap();
    assert_eq!(fp.len, 5);
    // sha256("hello")
    assert_eq!(
        fp.digest.as_deref(),
        Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
    );
}

#[test]
fn fingerprint_detects_content_change_at_same_length() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "f.txt", "aaaa");
    let before = fingerprint(&path).unwrap();
    std::fs::write(&path, "bbbb").unwrap();
    let after = fingerprint(&path).unwrap();
    assert_eq!(before.len, after.len);
    assert_ne!(before, after);
}

#[test]
fn snapshot_covers_nested_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.txt", "1");
    write(&dir, "sub/deep/b.txt", "2");

    let snap = snapshot(&[dir.path().to_path_buf()]);
    assert_eq!(snap.len(), 2);
    assert!(snap.contains_key(&dir.path().join("sub/deep/b.txt")));
}

#[test]
fn walker_queues_every_existing_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.txt", "1");
    write(&dir, "sub/b.txt", "2");
    let queue = Arc::new(SharedChangeQueue::new());

    let walker = Walker::spawn(queue.clone(), vec![dir.path().to_path_buf()]).unwrap();
    walker.join();

    assert_eq!(queue.len(), 2);
    let change = queue.pop().unwrap();
    assert_eq!(change.kind, ChangeKind::Add);
}

#[test]
fn monitor_detects_add_update_delete() {
    let dir = TempDir::new().unwrap();
    let stable = write(&dir, "stable.txt", "same");
    let doomed = write(&dir, "doomed.txt", "bye");
    let queue = Arc::new(SharedChangeQueue::new());
    let config = SyncConfig {
        watch_dirs: vec![dir.path().to_path_buf()],
        sync_deletes: true,
        ..SyncConfig::default()
    };

    let monitor =
        ChangeMonitor::spawn(queue.clone(), &config, Duration::from_millis(30)).unwrap();

    // Let the monitor take its initial snapshot, then change the tree.
    std::thread::sleep(Duration::from_millis(100));
    write(&dir, "new.txt", "fresh");
    std::fs::write(&stable, "different").unwrap();
    std::fs::remove_file(&doomed).unwrap();

    wait_until("three changes", || queue.len() >= 3);
    monitor.join();

    let mut changes = Vec::new();
    while let Some(change) = queue.pop() {
        changes.push(change);
    }
    assert!(changes
        .iter()
        .any(|c| c.path == dir.path().join("new.txt") && c.kind == ChangeKind::Add));
    assert!(changes
        .iter()
        .any(|c| c.path == stable && c.kind == ChangeKind::Update));
    assert!(changes
        .iter()
        .any(|c| c.path == doomed && c.kind == ChangeKind::Delete));
}

#[test]
fn monitor_ignores_updates_when_disabled() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "f.txt", "v1");
    let queue = Arc::new(SharedChangeQueue::new());
    let config = SyncConfig {
        watch_dirs: vec![dir.path().to_path_buf()],
        sync_updates: false,
        ..SyncConfig::default()
    };

    let monitor =
        ChangeMonitor::spawn(queue.clone(), &config, Duration::from_millis(30)).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    std::fs::write(&file, "v2").unwrap();
    std::thread::sleep(Duration::from_millis(200));
    monitor.join();

    assert!(queue.is_empty());
}

#[test]
fn monitor_stops_promptly() {
    let dir = TempDir::new().unwrap();
    let queue = Arc::new(SharedChangeQueue::new());
    let config = SyncConfig {
        watch_dirs: vec![dir.path().to_path_buf()],
        ..SyncConfig::default()
    };

    let monitor = ChangeMonitor::spawn(queue, &config, Duration::from_secs(60)).unwrap();
    let started = std::time::Instant::now();
    monitor.join();
    assert!(started.elapsed() < Duration::from_secs(5));
}
