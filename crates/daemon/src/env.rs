// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

/// Environment variable names used by the daemon.
pub mod names {
    /// Overrides the state directory, taking precedence over XDG paths.
    pub const SKIFF_STATE_DIR: &str = "SKIFF_STATE_DIR";
    /// XDG base directory for state files.
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
    /// Log filter, standard tracing syntax.
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Returns the value of `SKIFF_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(names::SKIFF_STATE_DIR).ok().map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(names::XDG_STATE_HOME).ok().map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
