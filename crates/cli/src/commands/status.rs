// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use skiff_ipc::DaemonStatus;

use crate::daemon::get_daemon_status;
use crate::error::Result;

pub fn run(state_dir: &Path) -> Result<()> {
    match get_daemon_status(state_dir) {
        Ok(Some(status)) => {
            print!("{}", render(&status));
            Ok(())
        }
        Ok(None) | Err(_) => {
            println!("Daemon:  not running");
            println!("Run 'skiff start' to begin syncing.");
            Ok(())
        }
    }
}

/// Render a status report, one field per line.
fn render(status: &DaemonStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Daemon:  running (pid {}, up {})\n",
        status.pid,
        format_uptime(status.uptime_secs)
    ));
    out.push_str(&format!("Phase:   {}\n", status.phase));
    if let Some(started) = status.started_at {
        out.push_str(&format!(
            "Started: {}\n",
            started.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out.push_str(&format!("Queued:  {}\n", status.queued));
    out.push_str(&format!("Failed:  {}\n", status.failed));
    if let Some(err) = &status.last_error {
        out.push_str(&format!(
            "Error:   {} (at {})\n",
            err.detail,
            err.occurred_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out
}

/// Format seconds as a compact human-readable duration.
fn format_uptime(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
