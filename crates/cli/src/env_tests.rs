// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Env vars are process-global; serialize the tests that touch them.
fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    match LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[test]
fn constants_match_env_var_names() {
    assert_eq!(names::SKIFF_STATE_DIR, "SKIFF_STATE_DIR");
    assert_eq!(names::XDG_STATE_HOME, "XDG_STATE_HOME");
    assert_eq!(names::SKIFF_DAEMON_BINARY, "SKIFF_DAEMON_BINARY");
}

#[test]
fn state_dir_returns_path_when_set() {
    let _lock = env_lock();
    let _guard = EnvGuard::set(names::SKIFF_STATE_DIR, "/custom/state");
    assert_eq!(state_dir(), Some(PathBuf::from("/custom/state")));
}

#[test]
fn daemon_binary_returns_none_when_unset() {
    let _lock = env_lock();
    let _guard = EnvGuard::remove(names::SKIFF_DAEMON_BINARY);
    assert_eq!(daemon_binary(), None);
}

#[test]
fn explicit_flag_wins_over_env() {
    let _lock = env_lock();
    let _guard = EnvGuard::set(names::SKIFF_STATE_DIR, "/env/state");
    let dir = resolve_state_dir(Some(PathBuf::from("/flag/state")));
    assert_eq!(dir, PathBuf::from("/flag/state"));
}

#[test]
fn env_override_wins_over_xdg() {
    let _lock = env_lock();
    let _state = EnvGuard::set(names::SKIFF_STATE_DIR, "/env/state");
    let _xdg = EnvGuard::set(names::XDG_STATE_HOME, "/xdg");
    assert_eq!(resolve_state_dir(None), PathBuf::from("/env/state"));
}

#[test]
fn xdg_state_home_gets_skiff_subdir() {
    let _lock = env_lock();
    let _state = EnvGuard::remove(names::SKIFF_STATE_DIR);
    let _xdg = EnvGuard::set(names::XDG_STATE_HOME, "/xdg");
    assert_eq!(resolve_state_dir(None), PathBuf::from("/xdg/skiff"));
}

/// RAII guard that sets/removes an env var and restores it on drop.
struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, original }
    }

    fn remove(key: &'static str) -> Self {
        let original = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(val) => std::env::set_var(self.key, val),
            None => std::env::remove_var(self.key),
        }
    }
}
