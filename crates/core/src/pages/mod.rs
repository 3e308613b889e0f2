//! The URL table: one record per indexed page.

pub mod store;

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use store::PageStore;

/// An indexed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageRecord {
    pub url: String,
    /// Normalized visible text of the page.
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 time the page was first indexed.
    #[serde(default)]
    pub added_at: String,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            title: String::new(),
            description: String::new(),
            added_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }

    /// Overwrite title and description with whichever of them is given and non-empty.
    ///
    /// Returns whether anything changed.
    pub fn apply_metadata(&mut self, title: Option<&str>, description: Option<&str>) -> bool {
        let mut changed = false;
        if let Some(title) = title.filter(|t| !t.is_empty())
            && self.title != title
        {
            self.title = title.to_string();
            changed = true;
        }
        if let Some(description) = description.filter(|d| !d.is_empty())
            && self.description != description
        {
            self.description = description.to_string();
            changed = true;
        }
        changed
    }
}

/// Title and description as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageSummary {
    pub title: String,
    pub description: String,
}

/// Pages keyed by URL, iterated in URL order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTable {
    pages: BTreeMap<String, PageRecord>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut PageRecord> {
        self.pages.get_mut(url)
    }

    /// Insert or replace the record for `record.url`.
    pub fn insert(&mut self, record: PageRecord) -> Option<PageRecord> {
        self.pages.insert(record.url.clone(), record)
    }

    pub fn remove(&mut self, url: &str) -> Option<PageRecord> {
        self.pages.remove(url)
    }

    pub fn records(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.values()
    }

    /// `(url, content)` pairs for the search engine.
    pub fn corpus(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pages.values().map(|p| (p.url.as_str(), p.content.as_str()))
    }

    pub fn summaries(&self) -> BTreeMap<String, PageSummary> {
        self.pages
            .iter()
            .map(|(url, p)| (url.clone(), PageSummary { title: p.title.clone(), description: p.description.clone() }))
            .collect()
    }
}

impl FromIterator<PageRecord> for PageTable {
    fn from_iter<T: IntoIterator<Item = PageRecord>>(iter: T) -> Self {
        let mut table = PageTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}
