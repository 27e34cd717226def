// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared IPC protocol for CLI-daemon communication.
//!
//! This crate defines the message types and framing protocol used between
//! the `skiff` CLI and the `skiffd` daemon. Messages are serialized as
//! JSON with length-prefixed framing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error returned by `FromStr` impls for IPC model types.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// Invalid phase string.
    InvalidPhase(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidPhase(s) => write!(f, "invalid phase: '{}'", s),
        }
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Model types for IPC serialization
// ============================================================================

/// Lifecycle phase of the sync process, mirrored for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Stopped,
    Starting,
    Running,
    Pausing,
    Paused,
    Resuming,
    Stopping,
    Error,
}

impl Phase {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stopped => "stopped",
            Phase::Starting => "starting",
            Phase::Running => "running",
            Phase::Pausing => "pausing",
            Phase::Paused => "paused",
            Phase::Resuming => "resuming",
            Phase::Stopping => "stopping",
            Phase::Error => "error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, ParseError> {
        match s.to_lowercase().as_str() {
            "stopped" => Ok(Phase::Stopped),
            "starting" => Ok(Phase::Starting),
            "running" => Ok(Phase::Running),
            "pausing" => Ok(Phase::Pausing),
            "paused" => Ok(Phase::Paused),
            "resuming" => Ok(Phase::Resuming),
            "stopping" => Ok(Phase::Stopping),
            "error" => Ok(Phase::Error),
            _ => Err(ParseError::InvalidPhase(s.to_string())),
        }
    }
}

impl From<Phase> for skiff_core::Phase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Stopped => skiff_core::Phase::Stopped,
            Phase::Starting => skiff_core::Phase::Starting,
            Phase::Running => skiff_core::Phase::Running,
            Phase::Pausing => skiff_core::Phase::Pausing,
            Phase::Paused => skiff_core::Phase::Paused,
            Phase::Resuming => skiff_core::Phase::Resuming,
            Phase::Stopping => skiff_core::Phase::Stopping,
            Phase::Error => skiff_core::Phase::Error,
        }
    }
}

impl From<skiff_core::Phase> for Phase {
    fn from(phase: skiff_core::Phase) -> Self {
        match phase {
            skiff_core::Phase::Stopped => Phase::Stopped,
            skiff_core::Phase::Starting => Phase::Starting,
            skiff_core::Phase::Running => Phase::Running,
            skiff_core::Phase::Pausing => Phase::Pausing,
            skiff_core::Phase::Paused => Phase::Paused,
            skiff_core::Phase::Resuming => Phase::Resuming,
            skiff_core::Phase::Stopping => Phase::Stopping,
            skiff_core::Phase::Error => Phase::Error,
        }
    }
}

/// Most recent sync process failure, mirrored for the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessErrorInfo {
    /// When the failure was captured.
    pub occurred_at: DateTime<Utc>,
    /// Human-readable detail.
    pub detail: String,
    /// Localization key for the error description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    /// Localization key for the suggested resolution, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_key: Option<String>,
}

impl From<skiff_core::ProcessError> for ProcessErrorInfo {
    fn from(e: skiff_core::ProcessError) -> Self {
        ProcessErrorInfo {
            occurred_at: e.occurred_at,
            detail: e.detail,
            description_key: e.description_key,
            resolution_key: e.resolution_key,
        }
    }
}

// ============================================================================
// Protocol types
// ============================================================================

/// Request sent from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonRequest {
    /// Ping to check if daemon is alive.
    Ping,
    /// Version handshake request.
    Hello { version: String },
    /// Get daemon and sync process status.
    Status,
    /// Begin syncing.
    Start,
    /// Stop syncing, discarding queued changes.
    Stop,
    /// Pause syncing, keeping queued changes.
    Pause,
    /// Resume syncing after a pause.
    Resume,
    /// Stop, then start again.
    Restart,
    /// Drop the retained sync error.
    ClearError,
    /// Graceful daemon shutdown.
    Shutdown,
}

/// Response sent from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonResponse {
    /// Pong response.
    Pong,
    /// Version handshake response.
    Hello { version: String },
    /// Status response.
    Status(DaemonStatus),
    /// Lifecycle request accepted (the transition may still be in flight).
    Ack,
    /// Error response.
    Error { message: String },
    /// Shutdown acknowledged.
    ShuttingDown,
}

/// Daemon and sync process status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    /// Current daemon PID.
    pub pid: u32,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// When the current run was started, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Changes waiting in the queue.
    pub queued: usize,
    /// Transfers recorded as failed since the last clear.
    pub failed: usize,
    /// The retained error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ProcessErrorInfo>,
}

// ============================================================================
// Message framing
// ============================================================================

/// IPC message framing.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Maximum message size (1MB) to prevent malformed messages from causing hangs.
    const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
