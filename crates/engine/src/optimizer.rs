// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transfer optimizer busy-check.
//!
//! The optimizer is an external routine that benchmarks transfer settings
//! against the store; while it runs it holds an exclusive flock on
//! `optimizer.lock` in the state directory. Starting a sync during a
//! benchmark would skew its measurements, so the orchestrator probes this
//! lock before starting.

use std::path::{Path, PathBuf};

use fs2::FileExt;
use skiff_core::OptimizerGuard;

/// Probes the optimizer lock file.
pub struct OptimizerLock {
    path: PathBuf,
}

impl OptimizerLock {
    /// Filename within the state directory.
    pub const FILE_NAME: &'static str = "optimizer.lock";

    pub fn new(state_dir: &Path) -> Self {
        OptimizerLock {
            path: state_dir.join(Self::FILE_NAME),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OptimizerGuard for OptimizerLock {
    fn is_running(&self) -> bool {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            // No lock file means no optimizer has ever run here.
            Err(_) => return false,
        };
        // Fully qualified: std::fs::File grew same-named inherent lock
        // methods, which would shadow the fs2 trait.
        match FileExt::try_lock_shared(&file) {
            Ok(()) => {
                let _ = FileExt::unlock(&file);
                false
            }
            Err(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "optimizer_tests.rs"]
mod tests;
