//! Fetch-through page cache.
//!
//! A URL is fetched from the network at most once: the normalized body is
//! written to the [`DiskCache`] under the URL's hash before it is returned,
//! and every later request is served from that entry verbatim. Requests for
//! the same URL are serialized on a per-key lock, so a second caller arriving
//! mid-fetch waits and then reads the entry the first one wrote.

use std::collections::HashMap;
use std::sync::Arc;

use pagetrie_core::{DiskCache, Error, compute_cache_key};
use tokio::sync::Mutex;

use crate::extract::normalize_whitespace;
use crate::fetch::PageSource;

/// Network source fronted by an on-disk cache.
pub struct PageCache {
    source: Arc<dyn PageSource>,
    disk: DiskCache,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PageCache {
    pub fn new(source: Arc<dyn PageSource>, disk: DiskCache) -> Self {
        Self { source, disk, in_flight: Mutex::new(HashMap::new()) }
    }

    pub fn disk(&self) -> &DiskCache {
        &self.disk
    }

    /// Create the cache directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        self.disk.ensure_dir().await
    }

    /// Whitespace-normalized body of `url`, from cache when present.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let key = compute_cache_key(url);
        let lock = self.key_lock(&key).await;

        let result = {
            let _guard = lock.lock().await;
            self.fetch_locked(url, &key).await
        };

        self.release_key(&key, lock).await;
        result
    }

    async fn fetch_locked(&self, url: &str, key: &str) -> Result<String, Error> {
        if let Some(text) = self.disk.read(key).await? {
            tracing::debug!(url, "reading from cache");
            return Ok(text);
        }

        tracing::debug!(url, "cache miss, fetching");
        let body = self.source.fetch_body(url).await?;
        let text = normalize_whitespace(&body);
        self.disk.write_once(key, &text).await?;

        Ok(text)
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.entry(key.to_string()).or_default().clone()
    }

    async fn release_key(&self, key: &str, lock: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // handles are only cloned and dropped under the map guard, so a count of
        // one means the map holds the last handle and nobody is waiting
        drop(lock);
        if in_flight.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            in_flight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubSource;
    use tempfile::tempdir;

    fn cache_with(source: Arc<StubSource>, dir: &std::path::Path) -> PageCache {
        PageCache::new(source, DiskCache::new(dir))
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let dir = tempdir().unwrap();
        let source = Arc::new(StubSource::new().page("http://x", "<p>hello   world</p>"));
        let cache = cache_with(source.clone(), dir.path());

        let first = cache.fetch("http://x").await.unwrap();
        let second = cache.fetch("http://x").await.unwrap();

        assert_eq!(first, "<p>hello world</p>");
        assert_eq!(first, second);
        assert_eq!(source.calls("http://x"), 1);
    }

    #[tokio::test]
    async fn test_existing_entry_is_returned_unchanged() {
        let dir = tempdir().unwrap();
        let disk = DiskCache::new(dir.path());
        disk.write_once(&compute_cache_key("http://x"), "cached  as-is").await.unwrap();

        let source = Arc::new(StubSource::new().page("http://x", "fresh"));
        let cache = cache_with(source.clone(), dir.path());

        assert_eq!(cache.fetch("http://x").await.unwrap(), "cached  as-is");
        assert_eq!(source.calls("http://x"), 0);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_hit_network_once() {
        let dir = tempdir().unwrap();
        let source = Arc::new(StubSource::new().page("http://x", "body").delayed());
        let cache = Arc::new(cache_with(source.clone(), dir.path()));

        let a = tokio::spawn({
            let cache = cache.clone();
            async move { cache.fetch("http://x").await }
        });
        let b = tokio::spawn({
            let cache = cache.clone();
            async move { cache.fetch("http://x").await }
        });

        assert_eq!(a.await.unwrap().unwrap(), "body");
        assert_eq!(b.await.unwrap().unwrap(), "body");
        assert_eq!(source.calls("http://x"), 1);
        assert!(cache.in_flight.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = Arc::new(StubSource::new().status("http://x", 404, "Not Found"));
        let cache = cache_with(source.clone(), dir.path());

        let err = cache.fetch("http://x").await.unwrap_err();
        assert!(matches!(err, Error::FetchStatus { status: 404, .. }));
        assert!(!cache.disk().contains(&compute_cache_key("http://x")).await.unwrap());

        // a failed fetch is retried next time
        cache.fetch("http://x").await.unwrap_err();
        assert_eq!(source.calls("http://x"), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let dir = tempdir().unwrap();
        let source = Arc::new(StubSource::new().page("http://x", "body"));
        let cache = cache_with(source, &dir.path().join("missing"));

        let err = cache.fetch("http://x").await.unwrap_err();
        assert!(err.is_storage());
    }
}
