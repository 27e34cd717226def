// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed transfer log.
//!
//! Every finished transfer is recorded here by the worker pool. The
//! orchestrator and the status surface read it through the
//! `StatusTracker` contract; per-file failures live here and never cause
//! lifecycle transitions.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use skiff_core::{StatusTracker, TransferOutcome, TransferRecord};

use crate::error::Result;

/// SQL schema for the transfer log database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transfers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL,
    content_id TEXT NOT NULL,
    outcome TEXT NOT NULL,
    detail TEXT,
    completed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transfers_outcome ON transfers(outcome);
CREATE INDEX IF NOT EXISTS idx_transfers_completed ON transfers(completed_at DESC);
"#;

/// How many successful transfers `recently_completed` returns.
const RECENT_LIMIT: usize = 100;

fn outcome_str(outcome: TransferOutcome) -> &'static str {
    match outcome {
        TransferOutcome::Uploaded => "uploaded",
        TransferOutcome::Deleted => "deleted",
        TransferOutcome::Failed => "failed",
    }
}

fn parse_outcome(value: &str) -> TransferOutcome {
    match value {
        "uploaded" => TransferOutcome::Uploaded,
        "deleted" => TransferOutcome::Deleted,
        _ => TransferOutcome::Failed,
    }
}

/// Transfer history, one SQLite database per state directory.
pub struct TransferLog {
    conn: Mutex<Connection>,
}

impl TransferLog {
    /// Filename within the state directory.
    pub const FILE_NAME: &'static str = "transfers.db";

    /// Open or create the log at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(TransferLog {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory log, for tests and ephemeral runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(TransferLog {
            conn: Mutex::new(conn),
        })
    }

    /// Record one finished transfer.
    pub fn record(&self, record: &TransferRecord) -> Result<()> {
        self.conn_lock().execute(
            "INSERT INTO transfers (path, content_id, outcome, detail, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.path.to_string_lossy(),
                record.content_id,
                outcome_str(record.outcome),
                record.detail,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn query(&self, sql: &str) -> Result<Vec<TransferRecord>> {
        let conn = self.conn_lock();
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map([], |row| {
                let path: String = row.get(0)?;
                let outcome: String = row.get(2)?;
                let completed: String = row.get(4)?;
                Ok(TransferRecord {
                    path: PathBuf::from(path),
                    content_id: row.get(1)?,
                    outcome: parse_outcome(&outcome),
                    detail: row.get(3)?,
                    completed_at: parse_timestamp(&completed),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn conn_lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl StatusTracker for TransferLog {
    fn failed(&self) -> Vec<TransferRecord> {
        self.query(
            "SELECT path, content_id, outcome, detail, completed_at
             FROM transfers WHERE outcome = 'failed' ORDER BY completed_at",
        )
        .unwrap_or_else(|e| {
            tracing::error!("transfer log read failed: {}", e);
            Vec::new()
        })
    }

    fn recently_completed(&self) -> Vec<TransferRecord> {
        self.query(&format!(
            "SELECT path, content_id, outcome, detail, completed_at
             FROM transfers WHERE outcome != 'failed'
             ORDER BY completed_at DESC LIMIT {RECENT_LIMIT}"
        ))
        .unwrap_or_else(|e| {
            tracing::error!("transfer log read failed: {}", e);
            Vec::new()
        })
    }

    fn clear_failed(&self) {
        let result = self
            .conn_lock()
            .execute("DELETE FROM transfers WHERE outcome = 'failed'", []);
        if let Err(e) = result {
            tracing::error!("transfer log clear failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
