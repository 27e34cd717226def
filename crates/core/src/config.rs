// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync agent configuration.
//!
//! Stored in `config.toml` inside the state directory and includes:
//! - `watch_dirs`: the local directories to synchronize
//! - `[store]`: where content goes (target directory, space id, prefix)
//! - behavior flags (`sync_deletes`, `sync_updates`, `update_suffix`, ...)
//!
//! The daemon and the CLI share [`load`] and [`save`] so both sides agree
//! on the file name and format. A missing file is not an error: the agent
//! starts with the default (incomplete) configuration and refuses to sync
//! until the operator writes one. A malformed file is an error so typos do
//! not silently turn flags off.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete configuration for one sync agent instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Local directories whose contents are synchronized.
    #[serde(default)]
    pub watch_dirs: Vec<PathBuf>,
    /// Remote content store settings. Absent until the operator configures
    /// one; `is_complete` is false without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
    /// Number of transfer worker threads (default: 3).
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
    /// Propagate local deletions to the store.
    #[serde(default)]
    pub sync_deletes: bool,
    /// Transfer modified files, not just new ones (default: true).
    #[serde(default = "default_true")]
    pub sync_updates: bool,
    /// When set, store updated content under `name.<suffix>` instead of
    /// overwriting the original content id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_suffix: Option<String>,
    /// With `update_suffix` set, keep the previous version under the
    /// suffixed id and write the update to the original id, instead of
    /// writing the update to the suffixed id.
    #[serde(default)]
    pub rename_updates: bool,
    /// Enqueue every existing file at startup instead of only changes
    /// observed after the walk (default: true).
    #[serde(default = "default_true")]
    pub jump_start: bool,
}

/// Remote content store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root of the content store. For the directory-backed store this is a
    /// local path; a network store implementation interprets it as an
    /// endpoint.
    pub target: PathBuf,
    /// Logical space (bucket) content ids live under.
    pub space_id: String,
    /// Optional prefix prepended to every content id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

fn default_thread_count() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            watch_dirs: Vec::new(),
            store: None,
            thread_count: default_thread_count(),
            sync_deletes: false,
            sync_updates: true,
            update_suffix: None,
            rename_updates: false,
            jump_start: true,
        }
    }
}

impl SyncConfig {
    /// True when the agent has everything it needs to start: at least one
    /// watch directory and a store section.
    pub fn is_complete(&self) -> bool {
        !self.watch_dirs.is_empty() && self.store.is_some()
    }
}

/// Configuration filename within the state directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load the configuration from the state directory.
pub fn load(state_dir: &Path) -> Result<SyncConfig> {
    let path = state_dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("no config at {}, starting unconfigured", path.display());
            return Ok(SyncConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content)
        .map_err(|e| Error::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Serialize and write the configuration, used by `skiff init`.
pub fn save(state_dir: &Path, config: &SyncConfig) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| Error::ConfigParse(e.to_string()))?;
    std::fs::write(state_dir.join(CONFIG_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
