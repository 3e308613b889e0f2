//! Core types and shared functionality for pagetrie.
//!
//! This crate provides:
//! - The on-disk page cache and its key hashing
//! - The autocomplete prefix tree
//! - Literal substring search with snippets
//! - The URL table and its JSON persistence
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod pages;
pub mod search;
pub mod trie;

pub use cache::{DiskCache, compute_cache_key};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use pages::{PageRecord, PageStore, PageSummary, PageTable};
pub use search::{SearchHit, SearchResults, search};
pub use trie::{Completion, PrefixTree};
