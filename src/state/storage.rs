//! Persistence backends for the identity record.
//!
//! `FileStorage` keeps one JSON document per key inside a directory, the
//! terminal stand-in for browser `localStorage`. Writes go to a temp file
//! first and are renamed into place so a crash never leaves half a record.
//!
//! Storage calls are synchronous. The session controller persists while
//! holding its state lock on the async executor; records are a few hundred
//! bytes, so the blocking write is accepted there.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::identity::Identity;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage for the identity record.
pub trait IdentityStorage: Send {
    /// Read the record under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or decoded.
    fn load(&self, key: &str) -> Result<Option<Identity>, StorageError>;

    /// Replace the record under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, key: &str, identity: &Identity) -> Result<(), StorageError>;

    /// Delete the record under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: IdentityStorage + Sync> IdentityStorage for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<Identity>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, identity: &Identity) -> Result<(), StorageError> {
        (**self).save(key, identity)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, Identity>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Identity>, StorageError> {
        let records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, identity: &Identity) -> Result<(), StorageError> {
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        records.insert(key.to_owned(), identity.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        records.remove(key);
        Ok(())
    }
}

/// JSON files under a directory, one per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io { path: path.to_path_buf(), source }
}

impl IdentityStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Identity>, StorageError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path)(e)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, key: &str, identity: &Identity) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let body = serde_json::to_vec_pretty(identity)?;
        fs::write(&tmp, body).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path)(e)),
        }
    }
}
