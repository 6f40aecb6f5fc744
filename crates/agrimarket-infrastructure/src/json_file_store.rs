//! Directory-backed key-value store.
//!
//! Each key lives in its own `<key>.json` file inside the data directory.
//! Values are opaque strings to this layer; the repository decides what they
//! contain.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use agrimarket_core::error::{MarketError, Result};
use agrimarket_core::store::KeyValueStore;
use tracing::debug;

/// Errors that can occur during file store operations.
#[derive(Debug)]
pub enum JsonFileStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// File locking error.
    LockError(String),
    /// Key cannot be used as a file name.
    InvalidKey(String),
}

impl std::fmt::Display for JsonFileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonFileStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            JsonFileStoreError::LockError(e) => write!(f, "Lock error: {}", e),
            JsonFileStoreError::InvalidKey(key) => write!(f, "Invalid store key: '{}'", key),
        }
    }
}

impl std::error::Error for JsonFileStoreError {}

impl From<std::io::Error> for JsonFileStoreError {
    fn from(e: std::io::Error) -> Self {
        JsonFileStoreError::IoError(e)
    }
}

impl From<JsonFileStoreError> for MarketError {
    fn from(e: JsonFileStoreError) -> Self {
        MarketError::storage(e.to_string())
    }
}

/// A key-value store keeping one JSON file per key.
///
/// Provides:
/// - **Atomicity**: Each write is all-or-nothing via tmp file + atomic rename
/// - **Isolation**: An exclusive lock file serializes writers of the same key
/// - **Durability**: Explicit fsync before rename
///
/// Read-modify-write cycles spanning several calls are not serialized;
/// concurrent writers get last-write-wins per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// The directory holding the store files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    fn key_path(&self, key: &str) -> std::result::Result<PathBuf, JsonFileStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JsonFileStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Gets a temporary file path for atomic writes.
    fn temp_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn write_atomic(&self, path: &Path, value: &str) -> std::result::Result<(), JsonFileStoreError> {
        let _lock = FileLock::acquire(path)?;

        // Write to temporary file in the same directory
        let tmp_path = Self::temp_path(path);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> std::result::Result<(), JsonFileStoreError> {
        let _lock = FileLock::acquire(path)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JsonFileStoreError::from(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.write_atomic(&path, value)?;
        debug!(key, bytes = value.len(), "Wrote store file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.remove_file(&path)?;
        Ok(())
    }
}

/// An exclusive lock on `<key>.lock`, released when the handle closes.
///
/// The lock file is never deleted: every writer must lock the same inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    /// Acquires an exclusive lock next to the given path.
    fn acquire(path: &Path) -> std::result::Result<Self, JsonFileStoreError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive().map_err(|e| {
            JsonFileStoreError::LockError(format!("Failed to acquire lock: {}", e))
        })?;

        Ok(FileLock { _file: file })
    }
}
