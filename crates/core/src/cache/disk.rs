//! Directory-backed cache store.
//!
//! Entries are plain UTF-8 files named by their key. A write lands in a
//! sibling `.partial` file first and is renamed into place, so readers never
//! observe a half-written entry and a failed write leaves other entries alone.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::Error;

/// Cache directory handle.
#[derive(Clone, Debug)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache directory if it is missing. Idempotent.
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::storage(self.root.display(), e))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Whether an entry exists for `key`.
    pub async fn contains(&self, key: &str) -> Result<bool, Error> {
        let path = self.entry_path(key);
        fs::try_exists(&path).await.map_err(|e| Error::storage(path.display(), e))
    }

    /// Read an entry, returning `None` when it is absent.
    pub async fn read(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage(path.display(), e)),
        }
    }

    /// Store `text` under `key` unless an entry already exists.
    ///
    /// Returns `false` when an existing entry was left in place.
    pub async fn write_once(&self, key: &str, text: &str) -> Result<bool, Error> {
        if self.contains(key).await? {
            return Ok(false);
        }

        let path = self.entry_path(key);
        let partial = self.root.join(format!("{key}.partial"));

        if let Err(e) = fs::write(&partial, text).await {
            let _ = fs::remove_file(&partial).await;
            return Err(Error::storage(partial.display(), e));
        }

        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(Error::storage(path.display(), e));
        }

        tracing::debug!(key, bytes = text.len(), "cache entry written");
        Ok(true)
    }
}
