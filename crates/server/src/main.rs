//! pagetrie MCP server entry point.
//!
//! Boots the page catalog and serves it over the MCP stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use pagetrie_client::Catalog;
use pagetrie_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let catalog = Arc::new(Catalog::open(&config).await?);

    tracing::info!(
        cache_dir = %config.cache_dir.display(),
        pages = catalog.len().await,
        "Starting pagetrie server on stdio transport"
    );

    let handler = handler::PagetrieServer::new(catalog, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
