// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

fn record(path: &str, outcome: TransferOutcome, detail: Option<&str>) -> TransferRecord {
    TransferRecord {
        path: PathBuf::from(path),
        content_id: path.trim_start_matches('/').to_string(),
        outcome,
        detail: detail.map(str::to_string),
        completed_at: Utc::now(),
    }
}

#[test]
fn records_and_reads_failures() {
    let log = TransferLog::open_in_memory().unwrap();
    log.record(&record("/d/ok.txt", TransferOutcome::Uploaded, None))
        .unwrap();
    log.record(&record(
        "/d/bad.txt",
        TransferOutcome::Failed,
        Some("store unreachable"),
    ))
    .unwrap();

    let failed = log.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, PathBuf::from("/d/bad.txt"));
    assert_eq!(failed[0].detail.as_deref(), Some("store unreachable"));
}

#[test]
fn recently_completed_excludes_failures() {
    let log = TransferLog::open_in_memory().unwrap();
    log.record(&record("/d/up.txt", TransferOutcome::Uploaded, None))
        .unwrap();
    log.record(&record("/d/gone.txt", TransferOutcome::Deleted, None))
        .unwrap();
    log.record(&record("/d/bad.txt", TransferOutcome::Failed, Some("x")))
        .unwrap();

    let recent = log.recently_completed();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|r| r.outcome != TransferOutcome::Failed));
}

#[test]
fn clear_failed_keeps_successes() {
    let log = TransferLog::open_in_memory().unwrap();
    log.record(&record("/d/ok.txt", TransferOutcome::Uploaded, None))
        .unwrap();
    log.record(&record("/d/bad.txt", TransferOutcome::Failed, None))
        .unwrap();

    log.clear_failed();

    assert!(log.failed().is_empty());
    assert_eq!(log.recently_completed().len(), 1);
}

#[test]
fn survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(TransferLog::FILE_NAME);
    {
        let log = TransferLog::open(&path).unwrap();
        log.record(&record("/d/bad.txt", TransferOutcome::Failed, None))
            .unwrap();
    }
    let log = TransferLog::open(&path).unwrap();
    assert_eq!(log.failed().len(), 1);
}
