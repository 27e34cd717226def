// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// Help template that splits the command list into themed sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Sync Control:
  start        Begin syncing watched directories
  stop         Stop syncing, discarding queued changes
  pause        Pause syncing, keeping queued changes
  resume       Resume syncing after a pause
  restart      Stop, then start again
  status       Show sync and daemon status
  clear-error  Drop the retained sync error

Setup & Daemon:
  init         Write the initial configuration
  daemon       Manage the background daemon";

const QUICKSTART_HELP: &str = "\
Get started:
  skiff init --watch ~/docs --target /mnt/store --space main
  skiff start              Begin syncing
  skiff status             Check what the agent is doing
  skiff stop               Stop syncing";

#[derive(Parser)]
#[command(name = "skiff")]
#[command(about = "A background file sync agent with a controllable lifecycle")]
#[command(
    long_about = "A background file sync agent.\n\n\
    Watches local directories and transfers new, changed, and deleted files\n\
    to a content store. The sync process runs inside the skiffd daemon and\n\
    is controlled from this CLI."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// State directory override (defaults to $XDG_STATE_HOME/skiff)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the initial configuration
    #[command(after_help = "Examples:\n  \
        skiff init --watch ~/docs --target /mnt/store --space main\n  \
        skiff init --watch ~/a --watch ~/b --target /mnt/store --space main\n  \
        skiff init --watch ~/docs --target /mnt/store --space main --prefix backups/")]
    Init {
        /// Local directory to watch (repeatable)
        #[arg(long, required = true, value_name = "DIR")]
        watch: Vec<PathBuf>,

        /// Root of the content store
        #[arg(long, value_name = "DIR")]
        target: PathBuf,

        /// Logical space (bucket) content ids live under
        #[arg(long, value_name = "ID")]
        space: String,

        /// Prefix prepended to every content id
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,

        /// Propagate local deletions to the store
        #[arg(long)]
        sync_deletes: bool,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Show sync and daemon status
    Status,

    /// Begin syncing (starts the daemon if needed)
    Start,

    /// Stop syncing, discarding queued changes
    Stop,

    /// Pause syncing, keeping queued changes
    Pause,

    /// Resume syncing after a pause
    Resume,

    /// Stop, then start again
    Restart,

    /// Drop the retained sync error
    ClearError,

    /// Manage the background daemon
    #[command(subcommand)]
    Daemon(DaemonCommand),
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon without starting a sync
    Start,
    /// Stop the daemon (drains in-flight transfers first)
    Stop,
    /// Show whether the daemon is running
    Status,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
