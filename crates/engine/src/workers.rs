// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The transfer worker pool.
//!
//! A fixed number of threads pull changes off the queue and apply them to
//! the remote store, recording every outcome in the transfer log. Paths
//! being worked on are tracked in an in-flight set that the drain loops
//! poll; halting intake stops workers from pulling new changes but lets
//! the current ones finish.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Utc;
use skiff_core::{StoreHandle, SyncConfig, TransferOutcome, TransferRecord};

use crate::queue::{Change, ChangeKind, SharedChangeQueue};
use crate::status::TransferLog;
use crate::store::content_id_for;

const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Fixed pool of transfer threads.
pub struct WorkerPool {
    intake_halted: Arc<AtomicBool>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn spawn(
        config: &SyncConfig,
        queue: Arc<SharedChangeQueue>,
        store: StoreHandle,
        log: Arc<TransferLog>,
    ) -> std::io::Result<Self> {
        let intake_halted = Arc::new(AtomicBool::new(false));
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let mut handles = Vec::with_capacity(config.thread_count);
        for i in 0..config.thread_count.max(1) {
            let worker = Worker {
                config: config.clone(),
                queue: queue.clone(),
                store: store.clone(),
                log: log.clone(),
                intake_halted: intake_halted.clone(),
                in_flight: in_flight.clone(),
            };
            let handle = std::thread::Builder::new()
                .name(format!("skiff-worker-{i}"))
                .spawn(move || worker.run())?;
            handles.push(handle);
        }
        Ok(WorkerPool {
            intake_halted,
            in_flight,
            handles: Mutex::new(handles),
        })
    }

    /// Paths currently being transferred.
    pub fn in_flight(&self) -> Vec<PathBuf> {
        lock_unpoisoned(&self.in_flight).iter().cloned().collect()
    }

    /// Stop workers from pulling new changes off the queue.
    pub fn halt_intake(&self) {
        self.intake_halted.store(true, Ordering::SeqCst);
    }

    /// Halt intake and wait for every worker to exit.
    pub fn join(&self) {
        self.halt_intake();
        let handles: Vec<JoinHandle<()>> = {
            let mut guard = match self.handles.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("transfer worker panicked");
            }
        }
    }
}

struct Worker {
    config: SyncConfig,
    queue: Arc<SharedChangeQueue>,
    store: StoreHandle,
    log: Arc<TransferLog>,
    intake_halted: Arc<AtomicBool>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl Worker {
    fn run(&self) {
        while !self.intake_halted.load(Ordering::SeqCst) {
            let Some(change) = self.queue.pop() else {
                std::thread::sleep(IDLE_WAIT);
                continue;
            };
            lock_unpoisoned(&self.in_flight).insert(change.path.clone());
            self.transfer(&change);
            lock_unpoisoned(&self.in_flight).remove(&change.path);
        }
    }

    fn transfer(&self, change: &Change) {
        let Some(content_id) = content_id_for(&self.config, &change.path) else {
            tracing::warn!(
                "{} is outside every watch directory, dropping",
                change.path.display()
            );
            return;
        };
        let result = self.apply(change, &content_id);
        let record = match result {
            Ok(outcome) => {
                tracing::debug!("{} {}", outcome_verb(outcome), content_id);
                TransferRecord {
                    path: change.path.clone(),
                    content_id,
                    outcome,
                    detail: None,
                    completed_at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::warn!("transfer of {} failed: {}", change.path.display(), e);
                TransferRecord {
                    path: change.path.clone(),
                    content_id,
                    outcome: TransferOutcome::Failed,
                    detail: Some(e.to_string()),
                    completed_at: Utc::now(),
                }
            }
        };
        if let Err(e) = self.log.record(&record) {
            tracing::error!("could not record transfer: {}", e);
        }
    }

    fn apply(&self, change: &Change, content_id: &str) -> skiff_core::Result<TransferOutcome> {
        match change.kind {
            ChangeKind::Add => {
                self.store.put(&change.path, content_id)?;
                Ok(TransferOutcome::Uploaded)
            }
            ChangeKind::Update => {
                match self.config.update_suffix.as_deref() {
                    None => self.store.put(&change.path, content_id)?,
                    Some(suffix) if self.config.rename_updates => {
                        // Keep the previous version under the suffixed id
                        // and the fresh content under the original.
                        self.store
                            .copy(content_id, &format!("{content_id}.{suffix}"))?;
                        self.store.put(&change.path, content_id)?;
                    }
                    Some(suffix) => {
                        self.store
                            .put(&change.path, &format!("{content_id}.{suffix}"))?;
                    }
                }
                Ok(TransferOutcome::Uploaded)
            }
            ChangeKind::Delete => {
                self.store.delete(content_id)?;
                Ok(TransferOutcome::Deleted)
            }
        }
    }
}

fn outcome_verb(outcome: TransferOutcome) -> &'static str {
    match outcome {
        TransferOutcome::Uploaded => "uploaded",
        TransferOutcome::Deleted => "deleted",
        TransferOutcome::Failed => "failed",
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
