//! Rate-limited crawl orchestrator.
//!
//! Fans a batch of URLs out over the [`PageCache`] with two ceilings: a start
//! rate ([`RateLimiter`]) and a cap on fetches in flight (a semaphore). URLs
//! are admitted in submission order. Every admitted fetch runs to completion;
//! if any of them failed, the batch as a whole fails with the first failure
//! observed.

pub mod limiter;

use std::collections::HashMap;
use std::sync::Arc;

use pagetrie_core::Error;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

pub use limiter::RateLimiter;

use crate::extract::page_text;
use crate::page_cache::PageCache;

/// Crawls URLs through the page cache under rate and concurrency ceilings.
#[derive(Clone)]
pub struct Crawler {
    cache: Arc<PageCache>,
    limiter: Arc<RateLimiter>,
    permits: Arc<Semaphore>,
}

impl Crawler {
    pub fn new(cache: Arc<PageCache>, requests_per_second: u32, max_concurrency: usize) -> Self {
        Self {
            cache,
            limiter: Arc::new(RateLimiter::per_second(requests_per_second)),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Fetch one URL under the same ceilings as a batch and return its page text.
    pub async fn crawl_one(&self, url: &str) -> Result<String, Error> {
        self.cache.ensure_dir().await?;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::HttpError(format!("crawler closed: {e}")))?;
        self.limiter.acquire().await;

        let body = self.cache.fetch(url).await?;
        Ok(page_text(&body))
    }

    /// Fetch every URL and map each to its page text.
    ///
    /// Duplicate URLs are fetched once. The result has one entry per distinct
    /// input URL; its order carries no meaning.
    pub async fn crawl_all(&self, urls: &[String]) -> Result<HashMap<String, String>, Error> {
        self.cache.ensure_dir().await?;

        let mut seen = std::collections::HashSet::new();
        let mut join_set = JoinSet::new();
        let mut task_urls: HashMap<task::Id, String> = HashMap::new();

        for url in urls.iter().filter(|u| seen.insert(u.as_str())) {
            let permit = self
                .permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::HttpError(format!("crawler closed: {e}")))?;
            self.limiter.acquire().await;

            let cache = self.cache.clone();
            let task_url = url.clone();
            let handle = join_set.spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = permit;
                let result = cache.fetch(&task_url).await.map(|body| page_text(&body));
                (task_url, result)
            });
            task_urls.insert(handle.id(), url.clone());
        }

        let mut texts = HashMap::with_capacity(join_set.len());
        let mut first_failure: Option<(String, Error)> = None;

        while let Some(joined) = join_set.join_next().await {
            let (url, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    let url = task_urls.remove(&e.id()).unwrap_or_default();
                    tracing::warn!(url = %url, error = %e, "crawl task failed");
                    if first_failure.is_none() {
                        first_failure = Some((url, Error::HttpError(format!("crawl task failed: {e}"))));
                    }
                    continue;
                }
            };

            match result {
                Ok(text) => {
                    texts.insert(url, text);
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "crawl fetch failed");
                    if first_failure.is_none() {
                        first_failure = Some((url, e));
                    }
                }
            }
        }

        if let Some((url, source)) = first_failure {
            return Err(Error::CrawlFailed { url, source: Box::new(source) });
        }

        tracing::info!(pages = texts.len(), "crawl complete");
        Ok(texts)
    }
}
