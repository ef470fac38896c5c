// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot store: the single well-known status file on a host.
//!
//! Writes go to `<path>.tmp` in the same directory and are renamed over
//! `<path>`, so a concurrent reader sees either the old or the new document.

use dlg_core::StatusSnapshot;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("snapshot {} is not valid: {source}", path.display())]
    Decode { path: PathBuf, source: serde_json::Error },

    #[error("cannot encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("another collector holds {}", .0.display())]
    Locked(PathBuf),
}

/// Exclusive collector lock; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn io(&self, path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(self.io(dir))
            }
            _ => Ok(()),
        }
    }

    /// Take the `<path>.lock` lock without waiting.
    pub fn try_lock(&self) -> Result<StoreLock, StoreError> {
        self.ensure_parent()?;
        let lock_path = self.sibling(".lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(self.io(&lock_path))?;
        if file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked(lock_path));
        }
        Ok(StoreLock { _file: file })
    }

    /// Atomically replace the snapshot file.
    pub fn publish(&self, snapshot: &StatusSnapshot) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.sibling(".tmp");
        // Flushed before the rename so a crash never leaves a torn snapshot
        let mut file = File::create(&tmp).map_err(self.io(&tmp))?;
        file.write_all(json.as_bytes()).map_err(self.io(&tmp))?;
        file.sync_all().map_err(self.io(&tmp))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(self.io(&self.path))?;
        tracing::debug!(path = %self.path.display(), count = snapshot.count, "published snapshot");
        Ok(())
    }

    pub fn load(&self) -> Result<StatusSnapshot, StoreError> {
        let text = std::fs::read_to_string(&self.path).map_err(self.io(&self.path))?;
        serde_json::from_str(&text)
            .map_err(|source| StoreError::Decode { path: self.path.clone(), source })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
