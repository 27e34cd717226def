// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine assembly.
//!
//! [`SyncEngineFactory`] starts all moving parts for one run: the startup
//! walker (when jump start is on), the delete checker (when delete
//! propagation is on), the polling change monitor, and the worker pool.
//! A component that fails to start unwinds everything started before it.
//! [`SyncEngine`] is the running bundle the orchestrator drains and shuts
//! down.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use skiff_core::{EngineFactory, StoreHandle, SyncConfig, TransferEngine};

use crate::deletes::DeleteChecker;
use crate::queue::SharedChangeQueue;
use crate::scan::{ChangeMonitor, Walker};
use crate::status::TransferLog;
use crate::workers::WorkerPool;

/// One running transfer engine.
pub struct SyncEngine {
    walker: Option<Walker>,
    deletes: Option<DeleteChecker>,
    monitor: ChangeMonitor,
    pool: WorkerPool,
    down: AtomicBool,
}

impl TransferEngine for SyncEngine {
    fn files_in_transfer(&self) -> Vec<PathBuf> {
        self.pool.in_flight()
    }

    fn halt_intake(&self) {
        if let Some(walker) = &self.walker {
            walker.stop();
        }
        if let Some(deletes) = &self.deletes {
            deletes.stop();
        }
        self.monitor.stop();
        self.pool.halt_intake();
    }

    fn shutdown(&self) {
        if self.down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.halt_intake();
        if let Some(walker) = &self.walker {
            walker.join();
        }
        if let Some(deletes) = &self.deletes {
            deletes.join();
        }
        self.monitor.join();
        self.pool.join();
        tracing::info!("transfer engine shut down");
    }
}

/// Builds and starts [`SyncEngine`]s against a shared queue and log.
pub struct SyncEngineFactory {
    queue: Arc<SharedChangeQueue>,
    status: Arc<TransferLog>,
    monitor_interval: Duration,
}

impl SyncEngineFactory {
    pub fn new(queue: Arc<SharedChangeQueue>, status: Arc<TransferLog>) -> Self {
        Self::with_interval(queue, status, ChangeMonitor::INTERVAL)
    }

    /// Override the monitor rescan interval.
    pub fn with_interval(
        queue: Arc<SharedChangeQueue>,
        status: Arc<TransferLog>,
        monitor_interval: Duration,
    ) -> Self {
        SyncEngineFactory {
            queue,
            status,
            monitor_interval,
        }
    }
}

impl EngineFactory for SyncEngineFactory {
    fn start_engine(
        &self,
        config: &SyncConfig,
        store: StoreHandle,
    ) -> skiff_core::Result<Arc<dyn TransferEngine>> {
        let monitor = ChangeMonitor::spawn(self.queue.clone(), config, self.monitor_interval)
            .map_err(|e| skiff_core::Error::Engine(format!("change monitor: {e}")))?;

        let walker = if config.jump_start {
            match Walker::spawn(self.queue.clone(), config.watch_dirs.clone()) {
                Ok(walker) => Some(walker),
                Err(e) => {
                    monitor.join();
                    return Err(skiff_core::Error::Engine(format!("walker: {e}")));
                }
            }
        } else {
            None
        };

        let deletes = if config.sync_deletes {
            match DeleteChecker::spawn(self.queue.clone(), config, store.clone()) {
                Ok(checker) => Some(checker),
                Err(e) => {
                    if let Some(walker) = &walker {
                        walker.stop();
                        walker.join();
                    }
                    monitor.join();
                    return Err(skiff_core::Error::Engine(format!("delete checker: {e}")));
                }
            }
        } else {
            None
        };

        let pool = match WorkerPool::spawn(config, self.queue.clone(), store, self.status.clone())
        {
            Ok(pool) => pool,
            Err(e) => {
                if let Some(walker) = &walker {
                    walker.stop();
                    walker.join();
                }
                if let Some(deletes) = &deletes {
                    deletes.stop();
                    deletes.join();
                }
                monitor.join();
                return Err(skiff_core::Error::Engine(format!("worker pool: {e}")));
            }
        };

        tracing::info!(
            "transfer engine started: {} workers, {} watch dirs",
            config.thread_count.max(1),
            config.watch_dirs.len()
        );
        Ok(Arc::new(SyncEngine {
            walker,
            deletes,
            monitor,
            pool,
            down: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
