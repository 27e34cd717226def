// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn daemon_not_running_includes_hint() {
    let msg = Error::DaemonNotRunning.to_string();
    assert!(msg.contains("daemon is not running"));
    assert!(msg.contains("skiff daemon start"));
}

#[test]
fn daemon_error_carries_message() {
    let msg = Error::Daemon("socket refused".to_string()).to_string();
    assert_eq!(msg, "daemon error: socket refused");
}

#[test]
fn not_configured_points_at_init() {
    assert!(Error::NotConfigured.to_string().contains("skiff init"));
}

#[test]
fn io_errors_convert() {
    let err: Error = std::io::Error::other("boom").into();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("boom"));
}
