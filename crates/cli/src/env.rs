// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Every environment variable the CLI reads lives here, behind a typed
//! accessor, so overrides are easy to audit.

use std::path::PathBuf;

/// Environment variable names used by the CLI.
pub mod names {
    /// Overrides the state directory, taking precedence over XDG paths.
    pub const SKIFF_STATE_DIR: &str = "SKIFF_STATE_DIR";
    /// XDG base directory for state files.
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
    /// Overrides the location of the skiffd binary.
    pub const SKIFF_DAEMON_BINARY: &str = "SKIFF_DAEMON_BINARY";
}

/// Returns the value of `SKIFF_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(names::SKIFF_STATE_DIR).ok().map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(names::XDG_STATE_HOME).ok().map(PathBuf::from)
}

/// Returns the value of `SKIFF_DAEMON_BINARY` if set.
pub fn daemon_binary() -> Option<PathBuf> {
    std::env::var(names::SKIFF_DAEMON_BINARY)
        .ok()
        .map(PathBuf::from)
}

/// Resolve the state directory from an explicit flag, environment
/// variables, and XDG defaults, in that order. Must match the daemon's
/// resolution so both sides agree on the socket location.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Some(dir) = state_dir() {
        return dir;
    }
    if let Some(dir) = xdg_state_home() {
        return dir.join("skiff");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/skiff"))
        .unwrap_or_else(|| PathBuf::from(".local/state/skiff"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
