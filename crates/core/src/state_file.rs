// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable runtime state, one record per state directory.
//!
//! The orchestrator writes the record after every accepted transition and
//! reads it once at construction to decide whether to auto-resume after an
//! unclean exit. A missing or unreadable file is never an error: the first
//! run starts from an empty record.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::phase::Phase;

/// The single persisted record: the last phase an accepted transition
/// reached, or `None` before the first transition ever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Last accepted lifecycle phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

/// Single-record store backed by a JSON file in the state directory.
pub struct RuntimeStateFile {
    path: PathBuf,
}

impl RuntimeStateFile {
    /// Filename within the state directory.
    pub const FILE_NAME: &'static str = "runtime_state.json";

    /// Create a handle for the given state directory.
    pub fn new(state_dir: &Path) -> Self {
        RuntimeStateFile {
            path: state_dir.join(Self::FILE_NAME),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, returning the default when the file is absent or
    /// unreadable. A corrupt record is logged and replaced by the default
    /// rather than failing the caller.
    pub fn load(&self) -> PersistedState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return PersistedState::default(),
        };
        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "ignoring corrupt runtime state at {}: {}",
                    self.path.display(),
                    e
                );
                PersistedState::default()
            }
        }
    }

    /// Overwrite the record with fsync for durability.
    ///
    /// Failure here is a state-durability error: the caller must refuse
    /// the transition it was about to make.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_vec(state)?;
        let mut file = std::fs::File::create(&self.path)
            .map_err(|e| Error::StateDurability(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(&json)
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::StateDurability(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_file_tests.rs"]
mod tests;
