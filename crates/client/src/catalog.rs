//! The page catalog: URL table, autocomplete index and the operations over them.
//!
//! One [`Catalog`] is built at startup and shared by reference with whatever
//! front end drives it. Reads (`list`, `search`, `autocomplete`) take a shared
//! lock; mutations take the exclusive lock for the whole in-memory change plus
//! the table rewrite, so a reader never sees a page without its index entries.
//! Network fetches happen outside the lock.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use pagetrie_core::{
    AppConfig, Completion, DiskCache, Error, PageRecord, PageStore, PageSummary, PageTable, PrefixTree, SearchResults,
};
use tokio::sync::RwLock;

use crate::crawl::Crawler;
use crate::fetch::{FetchClient, FetchConfig, parse_page_url};
use crate::page_cache::PageCache;

/// What an add call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStatus {
    /// The page was fetched and indexed.
    Added,
    /// The page was already present; its metadata changed.
    Updated,
    /// The page was already present and nothing changed.
    Unchanged,
}

#[derive(Debug, Default)]
struct CatalogState {
    pages: PageTable,
    tree: PrefixTree,
}

impl CatalogState {
    fn from_table(pages: PageTable) -> Self {
        let mut tree = PrefixTree::new();
        for record in pages.records() {
            tree.insert_text(&record.content);
        }
        Self { pages, tree }
    }
}

/// Indexed pages plus the machinery to add more.
pub struct Catalog {
    state: RwLock<CatalogState>,
    crawler: Crawler,
    store: Option<PageStore>,
}

impl Catalog {
    /// Build the catalog described by `config`, restoring any persisted table.
    pub async fn open(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from(config))?;
        let cache = PageCache::new(Arc::new(client), DiskCache::new(&config.cache_dir));
        let crawler = Crawler::new(Arc::new(cache), config.requests_per_second, config.max_concurrency);
        let store = config.table_path.as_ref().map(PageStore::new);

        Self::load(crawler, store).await
    }

    /// Restore the table from `store` (if any) and rebuild the prefix tree from it.
    pub async fn load(crawler: Crawler, store: Option<PageStore>) -> Result<Self, Error> {
        let pages = match &store {
            Some(store) => store.load().await?,
            None => PageTable::new(),
        };

        if !pages.is_empty() {
            tracing::info!(pages = pages.len(), "restored url table");
        }

        Ok(Self { state: RwLock::new(CatalogState::from_table(pages)), crawler, store })
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.pages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.pages.is_empty()
    }

    /// Title and description of every page, keyed by URL.
    pub async fn list(&self) -> BTreeMap<String, PageSummary> {
        self.state.read().await.pages.summaries()
    }

    /// Add `url`, or update its metadata if it is already present.
    ///
    /// A present page is never refetched or reindexed; only non-empty
    /// `title`/`description` values are applied. An absent page is fetched,
    /// stored and fed to the prefix tree. On any error nothing is stored.
    pub async fn add_or_update(
        &self, url: &str, title: Option<&str>, description: Option<&str>,
    ) -> Result<AddStatus, Error> {
        parse_page_url(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        {
            let mut state = self.state.write().await;
            if let Some(status) = self.update_metadata(&mut state, url, title, description).await? {
                return Ok(status);
            }
        }

        let content = self.crawler.crawl_one(url).await?;

        let mut state = self.state.write().await;
        // another caller may have added it while we were fetching
        if let Some(status) = self.update_metadata(&mut state, url, title, description).await? {
            return Ok(status);
        }

        let mut record = PageRecord::new(url, content.clone());
        record.apply_metadata(title, description);
        state.pages.insert(record);

        if let Err(e) = self.persist(&state.pages).await {
            state.pages.remove(url);
            return Err(e);
        }

        state.tree.insert_text(&content);

        tracing::info!(url, "page added");
        Ok(AddStatus::Added)
    }

    /// [`Catalog::add_or_update`] with fetch and storage failures folded into `false`.
    ///
    /// Only invalid input is still an error.
    pub async fn add(&self, url: &str, title: Option<&str>, description: Option<&str>) -> Result<bool, Error> {
        match self.add_or_update(url, title, description).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_fetch() || e.is_storage() => {
                tracing::warn!(url, error = %e, "add failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn update_metadata(
        &self, state: &mut CatalogState, url: &str, title: Option<&str>, description: Option<&str>,
    ) -> Result<Option<AddStatus>, Error> {
        let Some(record) = state.pages.get_mut(url) else {
            return Ok(None);
        };

        let previous = record.clone();
        if !record.apply_metadata(title, description) {
            return Ok(Some(AddStatus::Unchanged));
        }

        if let Err(e) = self.persist(&state.pages).await {
            state.pages.insert(previous);
            return Err(e);
        }

        tracing::info!(url, "page metadata updated");
        Ok(Some(AddStatus::Updated))
    }

    /// Forget `url`. Absent URLs are fine.
    ///
    /// The words the page contributed stay in the prefix tree.
    pub async fn remove(&self, url: &str) -> bool {
        let mut state = self.state.write().await;
        if state.pages.remove(url).is_none() {
            return false;
        }

        if let Err(e) = self.persist(&state.pages).await {
            tracing::warn!(url, error = %e, "removed page but failed to rewrite url table");
        }

        tracing::info!(url, "page removed");
        true
    }

    /// Crawl every URL not yet in the catalog and add them all, or none.
    ///
    /// Returns how many pages were added.
    pub async fn seed(&self, urls: &[String]) -> Result<usize, Error> {
        for url in urls {
            parse_page_url(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        }

        let missing: Vec<String> = {
            let state = self.state.read().await;
            let mut seen = HashSet::new();
            urls.iter()
                .filter(|u| !state.pages.contains(u) && seen.insert(u.as_str()))
                .cloned()
                .collect()
        };

        if missing.is_empty() {
            return Ok(0);
        }

        let texts = self.crawler.crawl_all(&missing).await?;

        let mut state = self.state.write().await;
        let fresh: Vec<String> = missing.into_iter().filter(|u| !state.pages.contains(u)).collect();
        for url in &fresh {
            if let Some(text) = texts.get(url) {
                state.pages.insert(PageRecord::new(url.clone(), text.clone()));
            }
        }

        if let Err(e) = self.persist(&state.pages).await {
            for url in &fresh {
                state.pages.remove(url);
            }
            return Err(e);
        }

        for url in &fresh {
            if let Some(text) = texts.get(url) {
                state.tree.insert_text(text);
            }
        }

        tracing::info!(added = fresh.len(), "catalog seeded");
        Ok(fresh.len())
    }

    /// Page `[start, start + max)` of the matches for `query`, numbered from 1.
    pub async fn search(&self, query: &str, start: usize, max: usize) -> Result<SearchResults, Error> {
        if max == 0 {
            return Err(Error::InvalidInput("max must be greater than 0".into()));
        }

        let state = self.state.read().await;
        Ok(pagetrie_core::search(query, start, max, state.pages.corpus()))
    }

    /// Best completion for `query`, matched exactly as given.
    pub async fn autocomplete(&self, query: &str) -> Option<Completion> {
        self.state.read().await.tree.complete(query)
    }

    async fn persist(&self, pages: &PageTable) -> Result<(), Error> {
        match &self.store {
            Some(store) => store.save(pages).await,
            None => Ok(()),
        }
    }
}
