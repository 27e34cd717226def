// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon lifecycle management.

#![allow(clippy::unwrap_used)]

use tempfile::tempdir;

use super::lifecycle::*;

#[test]
fn test_get_socket_path() {
    let dir = tempdir().unwrap();
    let socket_path = get_socket_path(dir.path());
    assert!(socket_path.ends_with("daemon.sock"));
}

#[test]
fn test_get_pid_path() {
    let dir = tempdir().unwrap();
    let pid_path = get_pid_path(dir.path());
    assert!(pid_path.ends_with("daemon.pid"));
}

#[test]
fn test_detect_daemon_no_socket() {
    let dir = tempdir().unwrap();
    let result = detect_daemon(dir.path()).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_daemon_info_fields() {
    let info = DaemonInfo { pid: 12345 };
    assert_eq!(info.pid, 12345);
}

// Crash recovery tests

#[test]
fn test_detect_daemon_cleans_up_stale_socket() {
    let dir = tempdir().unwrap();
    let socket_path = get_socket_path(dir.path());

    // Create a stale socket file (not a real socket)
    std::fs::write(&socket_path, "stale").unwrap();
    assert!(socket_path.exists());

    let result = detect_daemon(dir.path()).unwrap();
    assert!(result.is_none());

    // Socket should be cleaned up
    assert!(!socket_path.exists());
}

#[test]
fn test_detect_daemon_cleans_up_stale_pid() {
    let dir = tempdir().unwrap();
    let pid_path = get_pid_path(dir.path());

    // Create a stale PID file without a socket
    std::fs::write(&pid_path, "12345").unwrap();
    assert!(pid_path.exists());

    let result = detect_daemon(dir.path()).unwrap();
    assert!(result.is_none());

    // PID file should be cleaned up
    assert!(!pid_path.exists());
}

#[test]
fn test_detect_daemon_cleans_up_both_stale_files() {
    let dir = tempdir().unwrap();
    let socket_path = get_socket_path(dir.path());
    let pid_path = get_pid_path(dir.path());

    std::fs::write(&socket_path, "stale").unwrap();
    std::fs::write(&pid_path, "12345").unwrap();

    let result = detect_daemon(dir.path()).unwrap();
    assert!(result.is_none());

    assert!(!socket_path.exists());
    assert!(!pid_path.exists());
}

#[test]
fn test_stop_daemon_not_running() {
    let dir = tempdir().unwrap();

    // Trying to stop when no daemon is running should return an error
    let result = stop_daemon(dir.path());
    assert!(result.is_err());
}

#[test]
fn test_get_daemon_status_not_running() {
    let dir = tempdir().unwrap();

    // Getting status when no daemon is running should return None
    let result = get_daemon_status(dir.path()).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_stop_daemon_forcefully_no_daemon() {
    let dir = tempdir().unwrap();

    // Should succeed even when no daemon is running
    let result = stop_daemon_forcefully(dir.path());
    assert!(result.is_ok());
}

#[test]
fn test_stop_daemon_forcefully_cleans_stale_files() {
    let dir = tempdir().unwrap();
    let socket_path = get_socket_path(dir.path());
    let pid_path = get_pid_path(dir.path());

    // Stale files with a PID no live process can have
    std::fs::write(&socket_path, "stale").unwrap();
    std::fs::write(&pid_path, "999999999").unwrap();

    let result = stop_daemon_forcefully(dir.path());
    assert!(result.is_ok());
    assert!(!socket_path.exists());
    assert!(!pid_path.exists());
}
