// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Startup delete checker.
//!
//! When delete propagation is on, the polling monitor only sees files
//! that vanish while it is watching. This one-shot pass covers the gap:
//! it lists the store and queues a delete for every content id whose
//! local counterpart no longer exists.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use skiff_core::{StoreHandle, SyncConfig};

use crate::queue::{Change, ChangeKind, SharedChangeQueue};

/// Map a content id back to the local path it was uploaded from.
///
/// Returns `None` for ids that do not belong to any configured watch
/// directory, including ids written under the update suffix.
pub fn local_path_for(config: &SyncConfig, id: &str) -> Option<PathBuf> {
    let prefix = config
        .store
        .as_ref()
        .and_then(|s| s.prefix.as_deref())
        .unwrap_or("");
    let id = id.strip_prefix(prefix)?;
    if let Some(suffix) = config.update_suffix.as_deref() {
        if id.ends_with(&format!(".{suffix}")) {
            return None;
        }
    }
    let (root_name, rest) = id.split_once('/')?;
    let root = config
        .watch_dirs
        .iter()
        .find(|dir| dir.file_name().is_some_and(|n| n.to_string_lossy() == root_name))?;
    let mut path = root.clone();
    for part in rest.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    Some(path)
}

/// One-shot background pass queueing deletes for stale store content.
pub struct DeleteChecker {
    stop: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DeleteChecker {
    pub fn spawn(
        queue: Arc<SharedChangeQueue>,
        config: &SyncConfig,
        store: StoreHandle,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let config = config.clone();
        let handle = std::thread::Builder::new()
            .name("skiff-deletes".to_string())
            .spawn(move || {
                let ids = match store.list() {
                    Ok(ids) => ids,
                    Err(e) => {
                        tracing::warn!("delete check skipped, store list failed: {}", e);
                        return;
                    }
                };
                let mut queued = 0usize;
                for id in ids {
                    if stop_flag.load(Ordering::SeqCst) {
                        break;
                    }
                    let Some(path) = local_path_for(&config, &id) else {
                        continue;
                    };
                    if !path.exists() {
                        queue.push(Change {
                            path,
                            kind: ChangeKind::Delete,
                        });
                        queued += 1;
                    }
                }
                tracing::info!("delete check queued {} stale ids", queued);
            })?;
        Ok(DeleteChecker {
            stop,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Abandon the rest of the pass.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Wait for the pass to finish.
    pub fn join(&self) {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("delete checker thread panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "deletes_tests.rs"]
mod tests;
