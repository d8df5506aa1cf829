//! Durable key-value storage for the view state.
//!
//! # Responsibility
//! - Load and save one JSON document per key.
//!
//! # Invariants
//! - Keys map to file names containing only `[A-Za-z0-9_-]`.
//! - A missing entry is `Ok(None)`, not an error.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// View-state storage failures. Callers log and swallow these.
#[derive(Debug)]
pub enum StorageError {
    InvalidKey(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
            Self::Io { path, source } => {
                write!(f, "viewport storage io error at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Key-value storage for serialized view state.
pub trait ViewportStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileViewportStorage {
    dir: PathBuf,
}

impl FileViewportStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ViewportStorage for FileViewportStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

/// Process-local storage; contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryViewportStorage {
    entries: HashMap<String, String>,
}

impl MemoryViewportStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewportStorage for MemoryViewportStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileViewportStorage, StorageError, ViewportStorage};

    #[test]
    fn file_storage_roundtrips_and_reports_missing_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut storage = FileViewportStorage::new(dir.path().join("nested"));

        assert!(storage.load("familyTreeViewport").expect("load").is_none());
        storage
            .save("familyTreeViewport", "{\"scale\":1}")
            .expect("save creates the directory");
        assert_eq!(
            storage.load("familyTreeViewport").expect("load").as_deref(),
            Some("{\"scale\":1}")
        );
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileViewportStorage::new(dir.path());
        let err = storage.load("../escape").expect_err("key must be rejected");
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
