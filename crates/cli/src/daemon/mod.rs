// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management for the skiffd process.
//!
//! The CLI controls the sync process by talking to the skiffd daemon
//! over a Unix socket in the state directory.

mod client;
mod lifecycle;

pub use client::DaemonClient;
pub use lifecycle::{
    detect_daemon, get_daemon_status, get_socket_path, spawn_daemon, stop_daemon_forcefully,
    DaemonInfo,
};

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
