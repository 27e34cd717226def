// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning, detecting, and tearing down the skiffd process.
//!
//! The daemon (skiffd) is spawned as a background process and communicates
//! via Unix socket. PID and socket files live in the state directory
//! (~/.local/state/skiff/).

use std::fs;
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use skiff_ipc::{framing, DaemonRequest, DaemonResponse, DaemonStatus};

use crate::env;
use crate::error::{Error, Result};

/// Socket filename within the state directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within the state directory.
const PID_NAME: &str = "daemon.pid";

/// Information about a running daemon.
#[derive(Debug, Clone)]
pub struct DaemonInfo {
    /// Process ID of the daemon.
    pub pid: u32,
}

/// Get the socket path for the given state directory.
pub fn get_socket_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SOCKET_NAME)
}

/// Get the PID file path for the given state directory.
pub fn get_pid_path(state_dir: &Path) -> PathBuf {
    state_dir.join(PID_NAME)
}

/// Detect if a daemon is running for the given state directory.
///
/// Returns Some(DaemonInfo) if a daemon is running and responding,
/// None otherwise. Cleans up stale PID/socket files if found.
pub fn detect_daemon(state_dir: &Path) -> Result<Option<DaemonInfo>> {
    let socket_path = get_socket_path(state_dir);
    let pid_path = get_pid_path(state_dir);

    // Check if socket exists
    if !socket_path.exists() {
        // No socket, clean up stale PID file if it exists
        if pid_path.exists() {
            let _ = fs::remove_file(&pid_path);
        }
        return Ok(None);
    }

    // Try to connect and ping
    match UnixStream::connect(&socket_path) {
        Ok(mut stream) => {
            // Set a short timeout for the ping
            let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
            let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

            // Send ping request
            if framing::write_message(&mut stream, &DaemonRequest::Ping).is_err() {
                // Failed to write, daemon is dead
                cleanup_stale_files(state_dir);
                return Ok(None);
            }

            // Read response
            match framing::read_message(&mut stream) {
                Ok(DaemonResponse::Pong) => {
                    // Daemon is alive, read PID
                    match read_pid_file(&pid_path) {
                        Some(pid) if pid > 0 => Ok(Some(DaemonInfo { pid })),
                        _ => {
                            // PID file missing or invalid - daemon may be starting up
                            Ok(None)
                        }
                    }
                }
                _ => {
                    // Unexpected response or error
                    cleanup_stale_files(state_dir);
                    Ok(None)
                }
            }
        }
        Err(_) => {
            // Cannot connect, clean up stale files
            cleanup_stale_files(state_dir);
            Ok(None)
        }
    }
}

/// Get daemon status by connecting to the daemon.
pub fn get_daemon_status(state_dir: &Path) -> Result<Option<DaemonStatus>> {
    let socket_path = get_socket_path(state_dir);

    if !socket_path.exists() {
        return Ok(None);
    }

    match UnixStream::connect(&socket_path) {
        Ok(mut stream) => {
            let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
            let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

            framing::write_message(&mut stream, &DaemonRequest::Status)?;

            match framing::read_message(&mut stream)? {
                DaemonResponse::Status(status) => Ok(Some(status)),
                DaemonResponse::Error { message } => Err(Error::Daemon(message)),
                _ => Err(Error::Daemon("unexpected response".to_string())),
            }
        }
        Err(e) => {
            // Cannot connect
            cleanup_stale_files(state_dir);
            Err(Error::Io(e))
        }
    }
}

/// Send a shutdown request to the daemon.
pub(super) fn stop_daemon(state_dir: &Path) -> Result<()> {
    let socket_path = get_socket_path(state_dir);

    if !socket_path.exists() {
        return Err(Error::DaemonNotRunning);
    }

    let mut stream = UnixStream::connect(&socket_path)?;
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    framing::write_message(&mut stream, &DaemonRequest::Shutdown)?;

    match framing::read_message(&mut stream)? {
        DaemonResponse::ShuttingDown => Ok(()),
        DaemonResponse::Error { message } => Err(Error::Daemon(message)),
        _ => Err(Error::Daemon("unexpected response".to_string())),
    }
}

/// Find the skiffd binary.
fn find_skiffd_binary() -> PathBuf {
    // 1. Check SKIFF_DAEMON_BINARY env var
    if let Some(path) = env::daemon_binary() {
        return path;
    }

    // 2. Look next to the current executable
    if let Ok(exe) = std::env::current_exe() {
        let skiffd = exe.with_file_name("skiffd");
        if skiffd.exists() {
            return skiffd;
        }
    }

    // 3. Fall back to PATH
    PathBuf::from("skiffd")
}

/// Spawn a new daemon process for the given state directory.
///
/// Returns the DaemonInfo for the spawned daemon. The daemon itself
/// uses flock to guarantee a single instance per state directory.
pub fn spawn_daemon(state_dir: &Path) -> Result<DaemonInfo> {
    // Check if daemon is already running
    if let Some(info) = detect_daemon(state_dir)? {
        return Ok(info);
    }

    // Ensure state directory exists
    fs::create_dir_all(state_dir)?;

    // Find skiffd binary
    let skiffd_path = find_skiffd_binary();

    // Spawn daemon process
    let mut child = Command::new(&skiffd_path)
        .arg("--state-dir")
        .arg(state_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::Daemon(format!(
                "failed to start skiffd ({}): {}",
                skiffd_path.display(),
                e
            ))
        })?;

    // The daemon prints READY on stdout once its socket is listening
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        for line in reader.lines() {
            match line {
                Ok(line) if line == "READY" => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    // Poll until the socket answers a ping, bailing out if the child dies.
    for _ in 0..150 {
        if let Ok(Some(status)) = child.try_wait() {
            let stderr_output = if let Some(mut stderr) = child.stderr.take() {
                use std::io::Read;
                let mut output = String::new();
                let _ = stderr.read_to_string(&mut output);
                output
            } else {
                String::new()
            };
            return Err(Error::Daemon(format!(
                "daemon process exited with status: {}\n{}",
                status,
                stderr_output.trim()
            )));
        }

        if let Some(info) = detect_daemon(state_dir)? {
            return Ok(info);
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    Err(Error::Daemon(
        "daemon did not become reachable after startup".to_string(),
    ))
}

/// Clean up stale socket and PID files.
fn cleanup_stale_files(state_dir: &Path) {
    let socket_path = get_socket_path(state_dir);
    let pid_path = get_pid_path(state_dir);

    tracing::debug!("removing stale daemon files in {}", state_dir.display());
    let _ = fs::remove_file(&socket_path);
    let _ = fs::remove_file(&pid_path);
}

/// Read PID from the PID file.
fn read_pid_file(pid_path: &Path) -> Option<u32> {
    fs::read_to_string(pid_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Stop the daemon forcefully if graceful shutdown fails.
///
/// Tries graceful shutdown first, then sends SIGKILL if needed.
pub fn stop_daemon_forcefully(state_dir: &Path) -> Result<()> {
    let pid_path = get_pid_path(state_dir);

    // Read PID before attempting shutdown
    let pid = read_pid_file(&pid_path);

    // Try graceful shutdown first
    if stop_daemon(state_dir).is_ok() {
        // Wait for daemon to actually exit; shutdown drains in-flight
        // transfers, so this can take a while
        if let Some(pid) = pid {
            wait_for_process_exit(pid, Duration::from_secs(65));
        }
        cleanup_stale_files(state_dir);
        return Ok(());
    }

    // Graceful shutdown failed; if we have a PID, send SIGKILL
    if let Some(pid) = pid {
        let _ = Command::new("kill").arg("-9").arg(pid.to_string()).output();
        std::thread::sleep(Duration::from_millis(100));
    }

    // Clean up stale files
    cleanup_stale_files(state_dir);

    Ok(())
}

/// Wait for a process to exit, with timeout.
fn wait_for_process_exit(pid: u32, timeout: Duration) {
    let start = std::time::Instant::now();

    while start.elapsed() < timeout {
        let result = Command::new("kill").arg("-0").arg(pid.to_string()).output();

        match result {
            Ok(output) if !output.status.success() => return,
            Err(_) => return,
            _ => {}
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
