//! autocomplete tool implementation.

use pagetrie_client::Catalog;
use pagetrie_core::Completion;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for autocomplete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AutocompleteParams {
    /// Prefix to complete. Matched as given, without lowercasing.
    pub query: String,
}

/// Output structure for autocomplete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AutocompleteOutput {
    /// Best completion, or null when no indexed word has this prefix.
    pub result: Option<Completion>,
}

pub async fn autocomplete_impl(catalog: &Catalog, params: AutocompleteParams) -> Result<CallToolResult, McpError> {
    let output = AutocompleteOutput { result: catalog.autocomplete(&params.query).await };
    Ok(json_result(&output))
}
