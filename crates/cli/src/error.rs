// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the skiffrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("daemon is not running\n  hint: start it with 'skiff daemon start'")]
    DaemonNotRunning,

    #[error("daemon error: {0}")]
    Daemon(String),

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("not configured: run 'skiff init' first")]
    NotConfigured,

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for skiffrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
