// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IPC client for communicating with the skiffd daemon.
//!
//! Wraps a unix socket connection and the request/response exchange.

use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use skiff_ipc::{framing, DaemonRequest, DaemonResponse, DaemonStatus};

use crate::error::{Error, Result};

/// Connection timeout for daemon communication.
const TIMEOUT_SECS: u64 = 5;

/// A client connection to the daemon.
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connect to the daemon at the given socket path.
    pub fn connect(socket_path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(socket_path)
            .map_err(|e| Error::Daemon(format!("failed to connect to daemon: {}", e)))?;

        stream
            .set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        stream
            .set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set write timeout: {}", e)))?;

        Ok(DaemonClient { stream })
    }

    /// Send a request and receive a response.
    fn request(&mut self, request: DaemonRequest) -> Result<DaemonResponse> {
        framing::write_message(&mut self.stream, &request)?;
        Ok(framing::read_message(&mut self.stream)?)
    }

    /// Fetch the daemon and sync process status.
    pub fn status(&mut self) -> Result<DaemonStatus> {
        match self.request(DaemonRequest::Status)? {
            DaemonResponse::Status(status) => Ok(status),
            DaemonResponse::Error { message } => Err(Error::Daemon(message)),
            other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
        }
    }

    /// Send a lifecycle request (start, stop, pause, resume, restart,
    /// clear-error) and expect an acknowledgement.
    pub fn control(&mut self, request: DaemonRequest) -> Result<()> {
        match self.request(request)? {
            DaemonResponse::Ack => Ok(()),
            DaemonResponse::Error { message } => Err(Error::Daemon(message)),
            other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
        }
    }
}
