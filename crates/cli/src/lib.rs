// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! skiffrs - control library for the skiff sync agent.
//!
//! This crate provides the functionality behind the `skiff` CLI tool:
//! configuration bootstrap, daemon lifecycle management, and the
//! socket client used to drive the sync process running inside skiffd.
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - the clap command-line surface
//! - [`daemon`] - spawn, detect, and stop the skiffd daemon
//! - [`Error`] - error types for all operations
//!
//! The sync process itself lives in the daemon; every command here
//! resolves the state directory, then talks to the daemon socket
//! inside it.

mod cli;
mod commands;
mod daemon;

pub mod env;
pub mod error;

pub use cli::{Cli, Command, DaemonCommand};
pub use error::{Error, Result};

/// Execute a parsed CLI invocation. This is the main entry point for
/// library users and provides a testable way to run commands without
/// process execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = env::resolve_state_dir(cli.state_dir);

    match cli.command {
        Command::Init {
            watch,
            target,
            space,
            prefix,
            sync_deletes,
            force,
        } => commands::init::run(
            &state_dir,
            watch,
            target,
            space,
            prefix,
            sync_deletes,
            force,
        ),
        Command::Status => commands::status::run(&state_dir),
        Command::Start => commands::control::start(&state_dir),
        Command::Stop => commands::control::stop(&state_dir),
        Command::Pause => commands::control::pause(&state_dir),
        Command::Resume => commands::control::resume(&state_dir),
        Command::Restart => commands::control::restart(&state_dir),
        Command::ClearError => commands::control::clear_error(&state_dir),
        Command::Daemon(cmd) => match cmd {
            DaemonCommand::Start => commands::daemon::start(&state_dir),
            DaemonCommand::Stop => commands::daemon::stop(&state_dir),
            DaemonCommand::Status => commands::daemon::status(&state_dir),
        },
    }
}
