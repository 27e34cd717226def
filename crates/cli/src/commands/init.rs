// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use skiff_core::config::CONFIG_FILE_NAME;
use skiff_core::{StoreConfig, SyncConfig};

use crate::error::{Error, Result};

pub fn run(
    state_dir: &Path,
    watch: Vec<PathBuf>,
    target: PathBuf,
    space: String,
    prefix: Option<String>,
    sync_deletes: bool,
    force: bool,
) -> Result<()> {
    let config_path = state_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized(config_path.display().to_string()));
    }

    for dir in &watch {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "watch directory does not exist: {}",
                dir.display()
            )));
        }
    }

    let config = SyncConfig {
        watch_dirs: watch,
        store: Some(StoreConfig {
            target,
            space_id: space,
            prefix,
        }),
        sync_deletes,
        ..SyncConfig::default()
    };

    fs::create_dir_all(state_dir)?;
    skiff_core::config::save(state_dir, &config).map_err(|e| Error::Config(e.to_string()))?;

    println!("Initialized configuration at {}", config_path.display());
    println!("Run 'skiff start' to begin syncing.");
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
