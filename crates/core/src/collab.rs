// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator contracts consumed by the orchestrator.
//!
//! The orchestrator never touches files or the network itself; it drives
//! these traits. All of them are injected at construction so tests can
//! substitute doubles, and so no collaborator is a process-wide singleton.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::Result;

/// Handle to an authenticated remote content store session.
pub type StoreHandle = Arc<dyn RemoteStore>;

/// A remote content store: uploads, deletes, and listing by content id.
pub trait RemoteStore: Send + Sync {
    /// Store the file at `local` under `content_id`, replacing any
    /// existing content with that id.
    fn put(&self, local: &Path, content_id: &str) -> Result<()>;

    /// Remove the content with the given id. Removing an absent id is not
    /// an error.
    fn delete(&self, content_id: &str) -> Result<()>;

    /// Copy existing content to another id within the store, used to
    /// preserve the previous version when updates land under a suffix.
    fn copy(&self, from_id: &str, to_id: &str) -> Result<()>;

    /// List every content id currently in the store's space.
    fn list(&self) -> Result<Vec<String>>;
}

impl std::fmt::Debug for dyn RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn RemoteStore")
    }
}

/// Creates authenticated store sessions. Connection or credential
/// problems surface as [`crate::Error::Auth`] / [`crate::Error::Store`].
pub trait StoreConnector: Send + Sync {
    fn connect(&self) -> Result<StoreHandle>;
}

/// A running transfer engine: walker, change monitor, optional delete
/// checker, and the upload/delete worker pool, already started.
pub trait TransferEngine: Send + Sync {
    /// Paths currently being transferred by a worker. The drain loops in
    /// stop and pause poll this until it is empty.
    fn files_in_transfer(&self) -> Vec<PathBuf>;

    /// Stop taking on new work: halt the walker, monitor, and delete
    /// checker, and stop workers pulling from the queue. In-flight
    /// transfers keep running to completion.
    fn halt_intake(&self);

    /// Tear the engine down, joining all of its threads. Idempotent.
    fn shutdown(&self);
}

/// Builds and starts a [`TransferEngine`] for the given configuration and
/// store session. Implementations must unwind any partially started
/// components before returning an error.
pub trait EngineFactory: Send + Sync {
    fn start_engine(&self, config: &SyncConfig, store: StoreHandle)
        -> Result<Arc<dyn TransferEngine>>;
}

/// The queue of detected-but-not-started changes, shared between the
/// change monitor (producer) and the worker pool (consumer). The
/// orchestrator only reads it, except for the discard in `stop`.
pub trait ChangeQueue: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First `n` queued paths, oldest first, without dequeueing.
    fn peek(&self, n: usize) -> Vec<PathBuf>;

    /// Discard everything queued. Used by `stop`, never by `pause`.
    fn clear(&self);
}

/// How a finished transfer ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    Uploaded,
    Deleted,
    Failed,
}

/// One finished transfer as recorded by the status tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Local path the transfer was for.
    pub path: PathBuf,
    /// Content id it mapped to in the store.
    pub content_id: String,
    /// How it ended.
    pub outcome: TransferOutcome,
    /// Failure detail, for failed transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// When the transfer finished.
    pub completed_at: DateTime<Utc>,
}

/// Per-file transfer bookkeeping. Per-file failures never cause phase
/// transitions; they are visible only here and in the stats snapshot.
pub trait StatusTracker: Send + Sync {
    /// Transfers that failed since the last clear.
    fn failed(&self) -> Vec<TransferRecord>;

    /// Most recent successful transfers, bounded by the implementation.
    fn recently_completed(&self) -> Vec<TransferRecord>;

    /// Forget recorded failures.
    fn clear_failed(&self);
}

/// Busy-check for the external transfer-tuning routine. `start` refuses
/// to run while it holds the floor.
pub trait OptimizerGuard: Send + Sync {
    fn is_running(&self) -> bool;
}

/// The full set of collaborators the orchestrator is constructed with.
#[derive(Clone)]
pub struct Collaborators {
    pub connector: Arc<dyn StoreConnector>,
    pub factory: Arc<dyn EngineFactory>,
    pub queue: Arc<dyn ChangeQueue>,
    pub status: Arc<dyn StatusTracker>,
    pub optimizer: Arc<dyn OptimizerGuard>,
}
