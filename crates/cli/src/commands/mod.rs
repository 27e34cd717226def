// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod control;
pub mod daemon;
pub mod init;
pub mod status;

use std::path::Path;

use crate::daemon::{detect_daemon, get_socket_path, DaemonClient};
use crate::error::{Error, Result};

/// Connect to a running daemon, failing if there is none.
pub fn connect(state_dir: &Path) -> Result<DaemonClient> {
    if detect_daemon(state_dir)?.is_none() {
        return Err(Error::DaemonNotRunning);
    }
    DaemonClient::connect(&get_socket_path(state_dir))
}

/// Connect to the daemon, spawning one first if needed.
pub fn connect_or_spawn(state_dir: &Path) -> Result<DaemonClient> {
    crate::daemon::spawn_daemon(state_dir)?;
    DaemonClient::connect(&get_socket_path(state_dir))
}
