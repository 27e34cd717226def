// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The retained "most recent failure" value.
//!
//! The orchestrator keeps at most one of these. It is set by precondition
//! rejections and start-sequence failures, and cleared explicitly or by
//! the next successful start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum retained length for error detail, so a deep cause chain from a
/// failed engine startup stays displayable.
pub const MAX_DETAIL_LEN: usize = 500;

/// Immutable description of the most recent sync process failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessError {
    /// When the failure was captured.
    pub occurred_at: DateTime<Utc>,
    /// Human-readable detail, truncated to [`MAX_DETAIL_LEN`].
    pub detail: String,
    /// Localization key for the error description, if the surface has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    /// Localization key for the suggested resolution, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_key: Option<String>,
}

impl ProcessError {
    /// Capture a failure now, truncating the detail.
    pub fn new(detail: impl Into<String>) -> Self {
        let mut detail = detail.into();
        if detail.len() > MAX_DETAIL_LEN {
            // Truncate on a char boundary.
            let mut end = MAX_DETAIL_LEN;
            while !detail.is_char_boundary(end) {
                end -= 1;
            }
            detail.truncate(end);
        }
        ProcessError {
            occurred_at: Utc::now(),
            detail,
            description_key: None,
            resolution_key: None,
        }
    }

    /// Sets the localization keys (builder pattern).
    pub fn with_keys(
        mut self,
        description_key: impl Into<String>,
        resolution_key: impl Into<String>,
    ) -> Self {
        self.description_key = Some(description_key.into());
        self.resolution_key = Some(resolution_key.into());
        self
    }
}

#[cfg(test)]
#[path = "process_error_tests.rs"]
mod tests;
