//! Key-value storage port backing contacts, messages, settings, and personas.
//!
//! Core logic never touches the filesystem directly: it goes through
//! [`StorageBackend`], a small get/set/remove interface over string keys and
//! JSON string values. [`FileStore`] is the production implementation (one
//! JSON file per key under the platform data directory, written atomically);
//! [`MemoryStore`] backs tests.
//!
//! Read failures degrade to "no data" and write failures are logged and
//! swallowed; callers cannot distinguish a failed read from an absent record.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::warn;

/// Errors produced by a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Failed to read the record for a key.
    Read {
        key: String,
        source: std::io::Error,
    },

    /// Failed to write the record for a key.
    Write {
        key: String,
        source: std::io::Error,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Read { key, source } => {
                write!(f, "Failed to read storage key '{key}': {source}")
            }
            StorageError::Write { key, source } => {
                write!(f, "Failed to write storage key '{key}': {source}")
            }
        }
    }
}

impl StdError for StorageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StorageError::Read { source, .. } => Some(source),
            StorageError::Write { source, .. } => Some(source),
        }
    }
}

/// Key-value persistence over string keys and JSON string values.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize a record, degrading to `None` on any failure.
pub fn read_json<T: DeserializeOwned>(store: &dyn StorageBackend, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!("storage read for '{key}' failed, treating as empty: {err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("storage record '{key}' is not valid JSON, treating as empty: {err}");
            None
        }
    }
}

/// Serialize and write a record, logging and swallowing failures.
pub fn write_json<T: Serialize>(store: &mut dyn StorageBackend, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("failed to serialize storage record '{key}': {err}");
            return;
        }
    };
    if let Err(err) = store.set(key, &raw) {
        warn!("storage write for '{key}' failed, data not persisted: {err}");
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.records.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON file per key under the data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at the platform data directory.
    pub fn new() -> Self {
        let dir = ProjectDirs::from("org", "permacommons", "penpal")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    /// Open a store rooted at an explicit directory (used by tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        // Keys are internal identifiers but may embed contact ids; keep only
        // filesystem-safe characters.
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Read {
                key: key.to_string(),
                source,
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut temp_file = NamedTempFile::new_in(&self.dir)?;
            temp_file.write_all(value.as_bytes())?;
            temp_file.as_file_mut().sync_all()?;
            temp_file
                .persist(self.record_path(key))
                .map_err(|err| err.error)?;
            Ok(())
        };
        write().map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("alpha", "{\"a\":1}").unwrap();
        assert_eq!(store.get("alpha").unwrap().as_deref(), Some("{\"a\":1}"));
        store.remove("alpha").unwrap();
        assert_eq!(store.get("alpha").unwrap(), None);
    }

    #[test]
    fn read_json_degrades_to_none_on_garbage() {
        let mut store = MemoryStore::new();
        store.set("bad", "not json at all").unwrap();
        let value: Option<Vec<String>> = read_json(&store, "bad");
        assert!(value.is_none());
    }

    #[test]
    fn write_then_read_json() {
        let mut store = MemoryStore::new();
        write_json(&mut store, "list", &vec!["x".to_string(), "y".to_string()]);
        let value: Option<Vec<String>> = read_json(&store, "list");
        assert_eq!(value, Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::with_dir(dir.path());
        store.set("settings", "{\"dark\":true}").unwrap();
        assert_eq!(
            store.get("settings").unwrap().as_deref(),
            Some("{\"dark\":true}")
        );
        store.remove("settings").unwrap();
        assert_eq!(store.get("settings").unwrap(), None);
    }

    #[test]
    fn file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::with_dir(dir.path());
        store.set("messages/../../etc", "{}").unwrap();
        assert_eq!(store.get("messages/../../etc").unwrap().as_deref(), Some("{}"));
        // The record lands inside the store directory, not outside it.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::with_dir(dir.path());
        assert_eq!(store.get("absent").unwrap(), None);
    }
}
