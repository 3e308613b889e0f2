//! URL table tools: list_urls, add_url, remove_url.

use std::collections::BTreeMap;

use pagetrie_client::Catalog;
use pagetrie_core::PageSummary;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output structure for list_urls tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListUrlsOutput {
    /// Title and description of every indexed page, keyed by URL.
    pub urls: BTreeMap<String, PageSummary>,
}

/// Input parameters for add_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddUrlParams {
    /// Absolute http(s) URL to fetch and index.
    pub url: String,

    /// Display title. Empty or missing leaves the current title alone.
    #[serde(default)]
    pub title: Option<String>,

    /// Display description. Empty or missing leaves the current description alone.
    #[serde(default)]
    pub description: Option<String>,
}

/// Output structure for add_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddUrlOutput {
    /// False when the page could not be fetched or stored.
    pub ok: bool,
}

/// Input parameters for remove_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveUrlParams {
    /// URL to forget.
    pub url: String,
}

/// Output structure for remove_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveUrlOutput {
    /// Always true; removing an absent URL is not an error.
    pub success: bool,
}

pub async fn list_impl(catalog: &Catalog) -> Result<CallToolResult, McpError> {
    let output = ListUrlsOutput { urls: catalog.list().await };
    Ok(json_result(&output))
}

pub async fn add_impl(catalog: &Catalog, params: AddUrlParams) -> Result<CallToolResult, McpError> {
    let ok = catalog
        .add(&params.url, params.title.as_deref(), params.description.as_deref())
        .await?;
    Ok(json_result(&AddUrlOutput { ok }))
}

pub async fn remove_impl(catalog: &Catalog, params: RemoveUrlParams) -> Result<CallToolResult, McpError> {
    catalog.remove(&params.url).await;
    Ok(json_result(&RemoveUrlOutput { success: true }))
}
