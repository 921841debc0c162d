// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source checkpoint persistence.
//!
//! A checkpoint is an opaque cursor a connector hands back from `poll` and
//! gets back on the next call — a page token, a `since` timestamp, a last
//! seen id. The store doesn't interpret it, just persists it keyed by
//! source id.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists one opaque cursor per source id.
pub trait CheckpointStore: Send + Sync {
    fn load(&self, source_id: &str) -> Result<Option<Value>, CheckpointError>;
    fn save(&self, source_id: &str, cursor: Value) -> Result<(), CheckpointError>;
    fn clear(&self, source_id: &str) -> Result<(), CheckpointError>;
}

/// One JSON file per source, under a module's checkpoint directory.
/// Writes are atomic (write `.tmp`, fsync, rename).
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, source_id: &str) -> PathBuf {
        self.dir.join(format!("{source_id}.json"))
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self, source_id: &str) -> Result<Option<Value>, CheckpointError> {
        let path = self.path_for(source_id);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    fn save(&self, source_id: &str, cursor: Value) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(source_id);
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &cursor)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn clear(&self, source_id: &str) -> Result<(), CheckpointError> {
        let path = self.path_for(source_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory checkpoint store for tests and non-persistent module configs.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    cursors: Mutex<HashMap<String, Value>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, source_id: &str) -> Result<Option<Value>, CheckpointError> {
        Ok(self.cursors.lock().get(source_id).cloned())
    }

    fn save(&self, source_id: &str, cursor: Value) -> Result<(), CheckpointError> {
        self.cursors.lock().insert(source_id.to_string(), cursor);
        Ok(())
    }

    fn clear(&self, source_id: &str) -> Result<(), CheckpointError> {
        self.cursors.lock().remove(source_id);
        Ok(())
    }
}

/// Helper for tests that want a store pre-populated with a directory path
/// without creating it yet.
pub fn file_store_at(path: impl AsRef<Path>) -> FileCheckpointStore {
    FileCheckpointStore::new(path.as_ref().to_owned())
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
