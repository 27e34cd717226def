// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn load_missing_file_returns_default() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(dir.path());
    assert_eq!(file.load(), PersistedState::default());
    assert_eq!(file.load().phase, None);
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(dir.path());
    file.save(&PersistedState {
        phase: Some(Phase::Running),
    })
    .unwrap();
    assert_eq!(file.load().phase, Some(Phase::Running));
}

#[test]
fn save_overwrites_previous_record() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(dir.path());
    file.save(&PersistedState {
        phase: Some(Phase::Running),
    })
    .unwrap();
    file.save(&PersistedState {
        phase: Some(Phase::Stopped),
    })
    .unwrap();
    assert_eq!(file.load().phase, Some(Phase::Stopped));
}

#[test]
fn load_corrupt_file_returns_default() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(dir.path());
    std::fs::write(file.path(), "{not json").unwrap();
    assert_eq!(file.load(), PersistedState::default());
}

#[test]
fn save_into_missing_directory_is_durability_error() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(&dir.path().join("nope"));
    let err = file
        .save(&PersistedState {
            phase: Some(Phase::Running),
        })
        .unwrap_err();
    assert!(matches!(err, Error::StateDurability(_)));
}

#[test]
fn file_lives_under_state_dir() {
    let dir = TempDir::new().unwrap();
    let file = RuntimeStateFile::new(dir.path());
    assert_eq!(
        file.path(),
        dir.path().join(RuntimeStateFile::FILE_NAME).as_path()
    );
}
