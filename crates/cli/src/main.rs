//! Interactive page search shell.
//!
//! Optionally seeds the catalog from a file of URLs (one per line), then
//! reads commands from stdin until `quit` or end of input.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pagetrie_client::Catalog;
use pagetrie_core::AppConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

mod command;

use command::{Command, HELP, highlight};

#[derive(Debug, Parser)]
#[command(name = "pagetrie", version, about = "Search and autocomplete over a set of crawled pages.")]
struct Cli {
    /// File of URLs to crawl and index before the prompt appears, one per line.
    seed: Option<PathBuf>,

    /// Results per page for search.
    #[arg(long)]
    page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    let catalog = Catalog::open(&config).await?;

    if let Some(path) = &cli.seed {
        let urls = read_seed_file(path).await?;
        tracing::info!(path = %path.display(), urls = urls.len(), "seeding catalog");
        println!("crawling {} urls...", urls.len());
        let added = catalog.seed(&urls).await.context("seeding catalog")?;
        println!("indexed {added} new pages ({} total)", catalog.len().await);
    }

    repl(&catalog, config.page_size).await
}

async fn read_seed_file(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn repl(catalog: &Catalog, page_size: usize) -> Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut buffer = String::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        buffer.clear();
        if reader.read_line(&mut buffer).await? == 0 {
            break;
        }

        let command = Command::parse(&buffer);
        if command == Command::Quit {
            break;
        }

        let output = respond(catalog, command, page_size).await;
        stdout.write_all(output.as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}

/// Run one command and render what it prints, newline-terminated.
async fn respond(catalog: &Catalog, command: Command, page_size: usize) -> String {
    let mut out = String::new();
    match command {
        Command::Quit | Command::Empty => {}
        Command::Help => {
            let _ = writeln!(out, "{HELP}");
        }
        Command::List => {
            for (url, summary) in catalog.list().await {
                let _ = writeln!(out, "{url}\t{}\t{}", summary.title, summary.description);
            }
        }
        Command::Complete { prefix } => match catalog.autocomplete(&prefix).await {
            Some(completion) => {
                let _ = writeln!(out, "{} ({})", completion.word, completion.weight);
            }
            None => out.push_str("no completion\n"),
        },
        Command::Add { url, title } => {
            let _ = match catalog.add(&url, title.as_deref(), None).await {
                Ok(true) => writeln!(out, "added {url}"),
                Ok(false) => writeln!(out, "could not fetch {url}"),
                Err(e) => writeln!(out, "{e}"),
            };
        }
        Command::Remove { url } => {
            catalog.remove(&url).await;
            let _ = writeln!(out, "removed {url}");
        }
        Command::Search { query, start } => match catalog.search(&query, start, page_size).await {
            Ok(page) => {
                if page.results.is_empty() {
                    out.push_str("no matches\n");
                }
                for hit in &page.results {
                    let snippet = highlight(&hit.snippet, hit.query_position, query.len());
                    let _ = writeln!(out, "{}\n  {snippet}", hit.url);
                }
                if page.has_more {
                    let next = start.max(1) + page.results.len();
                    let _ = writeln!(out, "more: search {query} {next}");
                }
            }
            Err(e) => {
                let _ = writeln!(out, "{e}");
            }
        },
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    async fn empty_catalog() -> (TempDir, Catalog) {
        let dir = tempdir().unwrap();
        let config = AppConfig { cache_dir: dir.path().join("cached"), ..Default::default() };
        let catalog = Catalog::open(&config).await.unwrap();
        (dir, catalog)
    }

    #[tokio::test]
    async fn test_respond_on_empty_catalog() {
        let (_dir, catalog) = empty_catalog().await;

        assert_eq!(respond(&catalog, Command::List, 15).await, "");
        assert_eq!(respond(&catalog, Command::parse("search panda"), 15).await, "no matches\n");
        assert_eq!(respond(&catalog, Command::parse("complete pan"), 15).await, "no completion\n");
        assert_eq!(respond(&catalog, Command::parse("rm http://a"), 15).await, "removed http://a\n");
    }

    #[tokio::test]
    async fn test_respond_reports_bad_input() {
        let (_dir, catalog) = empty_catalog().await;

        let out = respond(&catalog, Command::parse("add not-a-url"), 15).await;
        assert!(out.starts_with("INVALID_URL"), "{out}");

        let out = respond(&catalog, Command::parse("search panda"), 0).await;
        assert!(out.starts_with("INVALID_INPUT"), "{out}");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let (_dir, catalog) = empty_catalog().await;
        let out = respond(&catalog, Command::Help, 15).await;
        assert!(out.contains("complete <prefix>"));
        assert!(out.ends_with('\n'));
    }
}
