// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection: the startup walker and the polling change monitor.
//!
//! Detection is fingerprint-based. A fingerprint is length plus mtime,
//! and for small files a sha256 digest as well, so a touch that rewrites
//! identical content does not queue a transfer. The monitor keeps a
//! snapshot per scan and diffs against it; there is no OS-level watch, a
//! full rescan runs every poll interval.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use skiff_core::SyncConfig;
use walkdir::WalkDir;

use crate::queue::{Change, ChangeKind, SharedChangeQueue};

/// Files at or below this size are content-hashed; larger files rely on
/// length and mtime alone.
pub const HASH_LIMIT: u64 = 1024 * 1024;

/// How the monitor decides whether a file changed between scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub len: u64,
    pub mtime: Option<SystemTime>,
    pub digest: Option<String>,
}

/// Fingerprint one file. Fails when the file vanishes mid-read.
pub fn fingerprint(path: &Path) -> std::io::Result<Fingerprint> {
    let meta = std::fs::metadata(path)?;
    let len = meta.len();
    let digest = if len <= HASH_LIMIT {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Some(hex::encode(hasher.finalize()))
    } else {
        None
    };
    Ok(Fingerprint {
        len,
        mtime: meta.modified().ok(),
        digest,
    })
}

/// Fingerprint every regular file under the given roots. Unreadable files
/// are logged and skipped.
pub fn snapshot(roots: &[PathBuf]) -> HashMap<PathBuf, Fingerprint> {
    let mut map = HashMap::new();
    for root in roots {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            match fingerprint(entry.path()) {
                Ok(fp) => {
                    map.insert(entry.path().to_path_buf(), fp);
                }
                Err(e) => {
                    tracing::debug!("skipping {}: {}", entry.path().display(), e);
                }
            }
        }
    }
    map
}

/// One-shot startup walker: queues every existing file as an add.
pub struct Walker {
    stop: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Walker {
    pub fn spawn(queue: Arc<SharedChangeQueue>, roots: Vec<PathBuf>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = std::thread::Builder::new()
            .name("skiff-walker".to_string())
            .spawn(move || {
                let mut queued = 0usize;
                'roots: for root in &roots {
                    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
                        if stop_flag.load(Ordering::SeqCst) {
                            break 'roots;
                        }
                        if entry.file_type().is_file() {
                            queue.push(Change {
                                path: entry.path().to_path_buf(),
                                kind: ChangeKind::Add,
                            });
                            queued += 1;
                        }
                    }
                }
                tracing::info!("walker queued {} existing files", queued);
            })?;
        Ok(Walker {
            stop,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Abandon the rest of the walk.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Wait for the walk to finish.
    pub fn join(&self) {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("walker thread panicked");
            }
        }
    }
}

/// Polling change monitor. Rescans the watch directories every interval
/// and queues adds, updates, and deletes per the configuration flags.
pub struct ChangeMonitor {
    stop: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ChangeMonitor {
    /// Default rescan interval.
    pub const INTERVAL: Duration = Duration::from_secs(2);

    pub fn spawn(
        queue: Arc<SharedChangeQueue>,
        config: &SyncConfig,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let roots = config.watch_dirs.clone();
        let sync_updates = config.sync_updates;
        let sync_deletes = config.sync_deletes;
        let handle = std::thread::Builder::new()
            .name("skiff-monitor".to_string())
            .spawn(move || {
                let mut previous = snapshot(&roots);
                while !stop_flag.load(Ordering::SeqCst) {
                    sleep_interruptibly(&stop_flag, interval);
                    if stop_flag.load(Ordering::SeqCst) {
                        break;
                    }
                    let current = snapshot(&roots);
                    for (path, fp) in &current {
                        match previous.get(path) {
                            None => queue.push(Change {
                                path: path.clone(),
                                kind: ChangeKind::Add,
                            }),
                            Some(old) if old != fp && sync_updates => queue.push(Change {
                                path: path.clone(),
                                kind: ChangeKind::Update,
                            }),
                            Some(_) => {}
                        }
                    }
                    if sync_deletes {
                        for path in previous.keys() {
                            if !current.contains_key(path) {
                                queue.push(Change {
                                    path: path.clone(),
                                    kind: ChangeKind::Delete,
                                });
                            }
                        }
                    }
                    previous = current;
                }
            })?;
        Ok(ChangeMonitor {
            stop,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Ask the monitor to stop after its current scan.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Stop and wait for the monitor thread to exit.
    pub fn join(&self) {
        self.stop();
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("monitor thread panicked");
            }
        }
    }
}

/// Sleep up to `total`, waking early when the stop flag is set.
fn sleep_interruptibly(stop: &AtomicBool, total: Duration) {
    let tick = Duration::from_millis(50);
    let mut slept = Duration::ZERO;
    while slept < total && !stop.load(Ordering::SeqCst) {
        let step = tick.min(total - slept);
        std::thread::sleep(step);
        slept += step;
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
