// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for skiff-engine operations.

use thiserror::Error;

/// All possible errors that can occur in skiff-engine operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transfer log error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker thread error: {0}")]
    Worker(String),
}

/// A specialized Result type for skiff-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for skiff_core::Error {
    fn from(e: Error) -> Self {
        skiff_core::Error::Engine(e.to_string())
    }
}
