//! JSON persistence for the URL table.
//!
//! The whole table is one document, rewritten on every change:
//!
//! ```json
//! { "version": 1, "urls": { "<url>": { "url": "...", "content": "...", ... } } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::PageTable;
use crate::Error;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    urls: PageTable,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    urls: &'a PageTable,
}

/// File the URL table lives in.
#[derive(Clone, Debug)]
pub struct PageStore {
    path: PathBuf,
}

impl PageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the table. A missing file is an empty table.
    pub async fn load(&self) -> Result<PageTable, Error> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PageTable::new()),
            Err(e) => return Err(Error::storage(self.path.display(), e)),
        };

        let doc: Document = serde_json::from_slice(&bytes).map_err(|e| Error::storage(self.path.display(), e))?;
        if doc.version != DOCUMENT_VERSION {
            return Err(Error::Storage(format!(
                "{}: unsupported document version {}",
                self.path.display(),
                doc.version
            )));
        }

        Ok(doc.urls)
    }

    /// Replace the stored document with `table`.
    pub async fn save(&self, table: &PageTable) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(&DocumentRef { version: DOCUMENT_VERSION, urls: table })
            .map_err(|e| Error::storage(self.path.display(), e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::storage(parent.display(), e))?;
        }

        let mut partial = self.path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        if let Err(e) = fs::write(&partial, &json).await {
            let _ = fs::remove_file(&partial).await;
            return Err(Error::storage(partial.display(), e));
        }

        if let Err(e) = fs::rename(&partial, &self.path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(Error::storage(self.path.display(), e));
        }

        tracing::debug!(path = %self.path.display(), pages = table.len(), "url table saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageRecord;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path().join("urls.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path().join("state").join("urls.json"));

        let mut table = PageTable::new();
        let mut record = PageRecord::new("http://x", "the red panda");
        record.apply_metadata(Some("Pandas"), Some("Red ones"));
        table.insert(record);

        store.save(&table).await.unwrap();
        assert_eq!(store.load().await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_document_shape() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path().join("urls.json"));

        let mut table = PageTable::new();
        table.insert(PageRecord::new("http://x", "text"));
        store.save(&table).await.unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["urls"]["http://x"]["content"], "text");
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_partial() {
        let dir = tempdir().unwrap();
        // a directory sits where the document should go
        let path = dir.path().join("urls.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = PageStore::new(&path).save(&PageTable::new()).await.unwrap_err();
        assert!(err.is_storage());
        assert!(!dir.path().join("urls.json.partial").exists());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = PageStore::new(&path).load().await.unwrap_err();
        assert!(err.is_storage());
    }

    #[tokio::test]
    async fn test_unknown_version_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.json");
        std::fs::write(&path, br#"{"version": 7, "urls": {}}"#).unwrap();

        let err = PageStore::new(&path).load().await.unwrap_err();
        assert!(err.to_string().contains("unsupported document version 7"));
    }
}
