// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for skiff-core operations.

use thiserror::Error;

/// All possible errors that can occur in skiff-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration incomplete: {0}\n  hint: set at least one watch directory and a store section in config.toml")]
    ConfigIncomplete(String),

    #[error("malformed configuration: {0}")]
    ConfigParse(String),

    #[error("no watch directories configured\n  hint: add watch_dirs entries in config.toml")]
    NoWatchDirs,

    #[error("transfer optimizer is running; wait for it to complete before starting")]
    OptimizerBusy,

    #[error("remote store authentication failed: {0}")]
    Auth(String),

    #[error("remote store error: {0}")]
    Store(String),

    #[error("transfer engine error: {0}")]
    Engine(String),

    #[error("cannot persist runtime state: {0}")]
    StateDurability(String),

    #[error("invalid phase: '{0}'")]
    InvalidPhase(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for skiff-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
