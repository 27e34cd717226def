// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::daemon::{detect_daemon, spawn_daemon, stop_daemon_forcefully};
use crate::error::Result;

pub fn start(state_dir: &Path) -> Result<()> {
    let info = spawn_daemon(state_dir)?;
    println!("Daemon running (pid {}).", info.pid);
    Ok(())
}

pub fn stop(state_dir: &Path) -> Result<()> {
    if detect_daemon(state_dir)?.is_none() {
        println!("Daemon is not running.");
        return Ok(());
    }
    stop_daemon_forcefully(state_dir)?;
    println!("Daemon stopped.");
    Ok(())
}

pub fn status(state_dir: &Path) -> Result<()> {
    match detect_daemon(state_dir)? {
        Some(info) => println!("Daemon running (pid {}).", info.pid),
        None => println!("Daemon is not running."),
    }
    Ok(())
}
