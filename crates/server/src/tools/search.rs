//! search tool implementation.
//!
//! Substring search over the content of every indexed page, paged by a
//! 1-based match counter.

use pagetrie_client::Catalog;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Literal, case-sensitive substring to look for.
    pub query: String,

    /// Number of the first match to return, counting from 1 (default: 0, same as 1).
    #[serde(default)]
    pub start: Option<usize>,

    /// Maximum results to return (default: server page size).
    #[serde(default)]
    pub max: Option<usize>,
}

pub async fn search_impl(
    catalog: &Catalog, params: SearchParams, page_size: usize,
) -> Result<CallToolResult, McpError> {
    let start = params.start.unwrap_or(0);
    let max = params.max.unwrap_or(page_size);

    let results = catalog.search(&params.query, start, max).await?;
    tracing::debug!(query = %params.query, start, max, hits = results.results.len(), "search");

    Ok(json_result(&results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{empty_catalog, output_json};

    #[tokio::test]
    async fn test_search_empty_catalog() {
        let (_dir, catalog) = empty_catalog().await;
        let params = SearchParams { query: "panda".into(), start: None, max: None };

        let result = search_impl(&catalog, params, 15).await.unwrap();
        let json = output_json(&result);
        assert_eq!(json["query"], "panda");
        assert_eq!(json["results"], serde_json::json!([]));
        assert_eq!(json["hasMore"], false);
    }

    #[tokio::test]
    async fn test_search_zero_max_is_invalid() {
        let (_dir, catalog) = empty_catalog().await;
        let params = SearchParams { query: "panda".into(), start: Some(1), max: Some(0) };

        let err = search_impl(&catalog, params, 15).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_params_defaults() {
        let params: SearchParams = serde_json::from_str(r#"{"query":"x"}"#).unwrap();
        assert_eq!(params.start, None);
        assert_eq!(params.max, None);
    }
}
