// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The shared change queue.
//!
//! A FIFO of detected changes, deduplicated by path: re-detecting a path
//! already queued updates its kind in place instead of queueing it twice.
//! The walker and change monitor push, the worker pool pops, and the
//! orchestrator observes it through the `ChangeQueue` contract.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use skiff_core::ChangeQueue;

/// What to do about a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// New file, not seen before.
    Add,
    /// Existing file whose content changed.
    Update,
    /// File removed locally; propagate to the store when enabled.
    Delete,
}

/// One detected change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

struct Inner {
    deque: VecDeque<Change>,
    queued: HashSet<PathBuf>,
}

/// Thread-safe dedup FIFO of [`Change`]s.
#[derive(Default)]
pub struct SharedChangeQueue {
    inner: Mutex<Inner>,
}

impl Default for Inner {
    fn default() -> Self {
        Inner {
            deque: VecDeque::new(),
            queued: HashSet::new(),
        }
    }
}

impl SharedChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change. A path already queued keeps its position but takes
    /// the newer kind.
    pub fn push(&self, change: Change) {
        let mut inner = self.lock();
        if inner.queued.contains(&change.path) {
            if let Some(existing) = inner.deque.iter_mut().find(|c| c.path == change.path) {
                existing.kind = change.kind;
            }
            return;
        }
        inner.queued.insert(change.path.clone());
        inner.deque.push_back(change);
    }

    /// Take the oldest queued change, if any.
    pub fn pop(&self) -> Option<Change> {
        let mut inner = self.lock();
        let change = inner.deque.pop_front()?;
        inner.queued.remove(&change.path);
        Some(change)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ChangeQueue for SharedChangeQueue {
    fn len(&self) -> usize {
        self.lock().deque.len()
    }

    fn peek(&self, n: usize) -> Vec<PathBuf> {
        self.lock()
            .deque
            .iter()
            .take(n)
            .map(|c| c.path.clone())
            .collect()
    }

    fn clear(&self) {
        let mut inner = self.lock();
        inner.deque.clear();
        inner.queued.clear();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
