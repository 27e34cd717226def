// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only process statistics snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time view of the sync process, computed on demand from the
/// engine's live counters. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// When the current run was started, if one is or was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Changes waiting in the queue.
    pub queued: usize,
    /// Transfers recorded as failed since the last clear.
    pub failed: usize,
}
