// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

fn add(path: &str) -> Change {
    Change {
        path: PathBuf::from(path),
        kind: ChangeKind::Add,
    }
}

#[test]
fn pops_in_fifo_order() {
    let queue = SharedChangeQueue::new();
    queue.push(add("a"));
    queue.push(add("b"));
    queue.push(add("c"));

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop().unwrap().path, PathBuf::from("a"));
    assert_eq!(queue.pop().unwrap().path, PathBuf::from("b"));
    assert_eq!(queue.pop().unwrap().path, PathBuf::from("c"));
    assert!(queue.pop().is_none());
}

#[test]
fn duplicate_path_keeps_position_and_takes_new_kind() {
    let queue = SharedChangeQueue::new();
    queue.push(add("a"));
    queue.push(add("b"));
    queue.push(Change {
        path: PathBuf::from("a"),
        kind: ChangeKind::Delete,
    });

    assert_eq!(queue.len(), 2);
    let first = queue.pop().unwrap();
    assert_eq!(first.path, PathBuf::from("a"));
    assert_eq!(first.kind, ChangeKind::Delete);
}

#[test]
fn path_can_requeue_after_pop() {
    let queue = SharedChangeQueue::new();
    queue.push(add("a"));
    queue.pop().unwrap();
    queue.push(add("a"));
    assert_eq!(queue.len(), 1);
}

#[test]
fn peek_does_not_dequeue() {
    let queue = SharedChangeQueue::new();
    queue.push(add("a"));
    queue.push(add("b"));
    queue.push(add("c"));

    assert_eq!(
        queue.peek(2),
        vec![PathBuf::from("a"), PathBuf::from("b")]
    );
    assert_eq!(queue.len(), 3);
}

#[test]
fn clear_empties_queue_and_dedup_set() {
    let queue = SharedChangeQueue::new();
    queue.push(add("a"));
    queue.clear();
    assert!(queue.is_empty());

    // The dedup set must forget cleared paths.
    queue.push(add("a"));
    assert_eq!(queue.len(), 1);
}
