// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync lifecycle commands: start, stop, pause, resume, restart,
//! clear-error.
//!
//! Each command sends a single request over the daemon socket. The
//! daemon acknowledges the request before the transition completes, so
//! these return as soon as the daemon has accepted the command.

use std::path::Path;

use skiff_ipc::DaemonRequest;

use crate::commands::{connect, connect_or_spawn};
use crate::error::Result;

pub fn start(state_dir: &Path) -> Result<()> {
    // Starting a sync is the one command that brings the daemon up
    let mut client = connect_or_spawn(state_dir)?;
    client.control(DaemonRequest::Start)?;
    println!("Sync starting.");
    Ok(())
}

pub fn stop(state_dir: &Path) -> Result<()> {
    let mut client = connect(state_dir)?;
    client.control(DaemonRequest::Stop)?;
    println!("Sync stopping; queued changes are discarded.");
    Ok(())
}

pub fn pause(state_dir: &Path) -> Result<()> {
    let mut client = connect(state_dir)?;
    client.control(DaemonRequest::Pause)?;
    println!("Sync pausing; queued changes are kept.");
    Ok(())
}

pub fn resume(state_dir: &Path) -> Result<()> {
    let mut client = connect(state_dir)?;
    client.control(DaemonRequest::Resume)?;
    println!("Sync resuming.");
    Ok(())
}

pub fn restart(state_dir: &Path) -> Result<()> {
    let mut client = connect(state_dir)?;
    client.control(DaemonRequest::Restart)?;
    println!("Sync restarting.");
    Ok(())
}

pub fn clear_error(state_dir: &Path) -> Result<()> {
    let mut client = connect(state_dir)?;
    client.control(DaemonRequest::ClearError)?;
    println!("Retained error cleared.");
    Ok(())
}
