//! Durable storage for backup records.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A keyed store of backup records.
///
/// The controller writes through this after every committed mutation, so a
/// crash loses at most the in-flight gesture.
pub trait Storage: Send + Sync {
    /// Save a document's backup record.
    fn save(&self, id: &str, record: &str) -> StorageResult<()>;

    /// Load a document's backup record.
    fn load(&self, id: &str) -> StorageResult<String>;

    /// Delete a document.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Check whether a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// In-memory storage, mostly for tests and embedding hosts that persist
/// elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, record: &str) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(e.to_string()))?;
        records.insert(id.to_string(), record.to_string());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<String> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(e.to_string()))?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(e.to_string()))?;
        records.remove(id);
        Ok(())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(e.to_string()))?;
        Ok(records.contains_key(id))
    }
}

/// Filesystem storage: one `<id>.json` per document under a base directory.
#[derive(Debug)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create the storage, making the base directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // Keep ids from escaping the base directory.
        let safe: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, record: &str) -> StorageResult<()> {
        let path = self.path_for(id);
        fs::write(&path, record)?;
        log::debug!("saved {} ({} bytes)", path.display(), record.len());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<String> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.path_for(id).exists())
    }
}
