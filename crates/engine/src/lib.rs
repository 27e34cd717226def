// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! skiff-engine: the transfer engine behind the skiff sync agent
//!
//! Implements the collaborator contracts from `skiff-core`: the shared
//! change queue, the walker and change monitor that feed it, the worker
//! pool that drains it into a remote store, the SQLite transfer log, the
//! directory-backed store, and the optimizer lock probe.

pub mod deletes;
pub mod engine;
pub mod error;
pub mod optimizer;
pub mod queue;
pub mod scan;
pub mod status;
pub mod store;
pub mod workers;

pub use engine::{SyncEngine, SyncEngineFactory};
pub use error::{Error, Result};
pub use optimizer::OptimizerLock;
pub use queue::{Change, ChangeKind, SharedChangeQueue};
pub use scan::{ChangeMonitor, Fingerprint, Walker};
pub use status::TransferLog;
pub use store::{DirStore, DirStoreConnector};
pub use workers::WorkerPool;

use std::path::Path;
use std::sync::Arc;

use skiff_core::{Collaborators, SyncConfig};

/// Wire up the full production collaborator set for one state directory.
///
/// The same queue instance feeds the engine factory and the orchestrator,
/// so a `stop` discard is visible to both sides.
pub fn build_collaborators(
    state_dir: &Path,
    config: &SyncConfig,
) -> skiff_core::Result<Collaborators> {
    let queue = Arc::new(SharedChangeQueue::new());
    let status = Arc::new(TransferLog::open(&state_dir.join(TransferLog::FILE_NAME))?);
    Ok(Collaborators {
        connector: Arc::new(DirStoreConnector::new(config.store.clone())),
        factory: Arc::new(SyncEngineFactory::new(queue.clone(), status.clone())),
        queue,
        status,
        optimizer: Arc::new(OptimizerLock::new(state_dir)),
    })
}
