//! MCP tool implementations.
//!
//! This module contains all tools exposed by the pagetrie server.

pub mod autocomplete;
pub mod search;
pub mod urls;

pub use autocomplete::AutocompleteParams;
pub use search::SearchParams;
pub use urls::{AddUrlParams, RemoveUrlParams};

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Wrap a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(output).unwrap_or_default())])
}
