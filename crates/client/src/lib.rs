//! Client code for pagetrie.
//!
//! This crate provides the HTTP fetch pipeline, HTML-to-text extraction, the
//! fetch-through page cache, the rate-limited crawler and the [`Catalog`]
//! that ties them to the URL table and autocomplete index.

pub mod catalog;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod page_cache;

#[cfg(test)]
mod test_support;

pub use catalog::{AddStatus, Catalog};
pub use crawl::{Crawler, RateLimiter};
pub use extract::{normalize_whitespace, page_text, visible_text};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageSource, parse_page_url};
pub use page_cache::PageCache;
