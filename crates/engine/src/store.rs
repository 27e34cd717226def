// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed remote store.
//!
//! Content ids are slash-separated relative paths prefixed with the watch
//! directory's name, so multiple watch directories share one space without
//! colliding. The store maps each id to a file under
//! `<target>/<space_id>/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skiff_core::{RemoteStore, StoreConfig, StoreConnector, StoreHandle, SyncConfig};
use walkdir::WalkDir;

/// Compute the content id for a local path under one watch directory.
///
/// Returns `None` when `path` is not under `root`.
pub fn content_id(root: &Path, path: &Path, prefix: Option<&str>) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let root_name = root.file_name()?.to_string_lossy();
    let mut id = String::new();
    if let Some(prefix) = prefix {
        id.push_str(prefix);
    }
    id.push_str(&root_name);
    for part in rel.components() {
        id.push('/');
        id.push_str(&part.as_os_str().to_string_lossy());
    }
    Some(id)
}

/// Resolve the content id for `path` against every watch directory in the
/// configuration, using the first one that contains it.
pub fn content_id_for(config: &SyncConfig, path: &Path) -> Option<String> {
    let prefix = config
        .store
        .as_ref()
        .and_then(|s| s.prefix.as_deref());
    config
        .watch_dirs
        .iter()
        .find_map(|root| content_id(root, path, prefix))
}

/// A remote store backed by a local directory tree.
pub struct DirStore {
    space_root: PathBuf,
}

impl DirStore {
    /// Open the store for one space, creating its directory if missing.
    pub fn open(target: &Path, space_id: &str) -> skiff_core::Result<Self> {
        let space_root = target.join(space_id);
        std::fs::create_dir_all(&space_root)
            .map_err(|e| skiff_core::Error::Store(format!("{}: {}", space_root.display(), e)))?;
        Ok(DirStore { space_root })
    }

    fn content_path(&self, content_id: &str) -> PathBuf {
        let mut path = self.space_root.clone();
        for part in content_id.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path
    }
}

impl RemoteStore for DirStore {
    fn put(&self, local: &Path, content_id: &str) -> skiff_core::Result<()> {
        let dest = self.content_path(content_id);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| skiff_core::Error::Store(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::copy(local, &dest)
            .map_err(|e| skiff_core::Error::Store(format!("put {}: {}", content_id, e)))?;
        Ok(())
    }

    fn delete(&self, content_id: &str) -> skiff_core::Result<()> {
        let dest = self.content_path(content_id);
        match std::fs::remove_file(&dest) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(skiff_core::Error::Store(format!(
                "delete {}: {}",
                content_id, e
            ))),
        }
    }

    fn copy(&self, from_id: &str, to_id: &str) -> skiff_core::Result<()> {
        let dest = self.content_path(to_id);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| skiff_core::Error::Store(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::copy(self.content_path(from_id), &dest).map_err(|e| {
            skiff_core::Error::Store(format!("copy {} -> {}: {}", from_id, to_id, e))
        })?;
        Ok(())
    }

    fn list(&self) -> skiff_core::Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.space_root) {
            let entry =
                entry.map_err(|e| skiff_core::Error::Store(format!("list: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.space_root) {
                let id: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                ids.push(id.join("/"));
            }
        }
        Ok(ids)
    }
}

/// Connects to the configured directory store. Fails with a configuration
/// error when no store section is present.
pub struct DirStoreConnector {
    store: Option<StoreConfig>,
}

impl DirStoreConnector {
    pub fn new(store: Option<StoreConfig>) -> Self {
        DirStoreConnector { store }
    }
}

impl StoreConnector for DirStoreConnector {
    fn connect(&self) -> skiff_core::Result<StoreHandle> {
        let store = self.store.as_ref().ok_or_else(|| {
            skiff_core::Error::ConfigIncomplete("no store configured".to_string())
        })?;
        let handle = DirStore::open(&store.target, &store.space_id)?;
        tracing::info!(
            "connected to store {} space {}",
            store.target.display(),
            store.space_id
        );
        Ok(Arc::new(handle))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
