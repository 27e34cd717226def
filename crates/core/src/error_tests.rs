// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn error_messages_include_context() {
    let err = Error::Auth("bad credentials for space docs".to_string());
    assert!(err.to_string().contains("bad credentials"));

    let err = Error::StateDurability("/tmp/state: permission denied".to_string());
    assert!(err.to_string().contains("cannot persist runtime state"));
    assert!(err.to_string().contains("permission denied"));

    let err = Error::InvalidPhase("halted".to_string());
    assert_eq!(err.to_string(), "invalid phase: 'halted'");
}

#[test]
fn hints_attached_to_config_errors() {
    assert!(Error::NoWatchDirs.to_string().contains("hint:"));
    assert!(Error::ConfigIncomplete("no store".to_string())
        .to_string()
        .contains("hint:"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn json_error_converts() {
    let json = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
    let err: Error = json.into();
    assert!(matches!(err, Error::Json(_)));
}
