//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PAGETRIE_*)
//! 2. TOML config file (if PAGETRIE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAGETRIE_*)
/// 2. TOML config file (if PAGETRIE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding fetched page bodies, one file per URL hash.
    ///
    /// Set via PAGETRIE_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// JSON document the URL table is persisted to.
    ///
    /// Set via PAGETRIE_TABLE_PATH environment variable. Unset keeps the
    /// table in memory only.
    #[serde(default)]
    pub table_path: Option<PathBuf>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via PAGETRIE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via PAGETRIE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via PAGETRIE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Crawl ceiling on fetches started per second.
    ///
    /// Set via PAGETRIE_REQUESTS_PER_SECOND environment variable.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Crawl ceiling on fetches in flight at once.
    ///
    /// Set via PAGETRIE_MAX_CONCURRENCY environment variable.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Results per page when a search caller gives no `max`.
    ///
    /// Set via PAGETRIE_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cached")
}

fn default_user_agent() -> String {
    "pagetrie/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_requests_per_second() -> u32 {
    50
}

fn default_max_concurrency() -> usize {
    16
}

fn default_page_size() -> usize {
    15
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            table_path: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            requests_per_second: default_requests_per_second(),
            max_concurrency: default_max_concurrency(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PAGETRIE_`
    /// 2. TOML file from `PAGETRIE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PAGETRIE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAGETRIE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
