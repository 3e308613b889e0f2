//! Unified error types for pagetrie.
//!
//! Fetch and storage failures are the two classes callers branch on; see
//! [`Error::is_fetch`] and [`Error::is_storage`].

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Longest status message carried by [`Error::FetchStatus`], in bytes.
pub const MAX_STATUS_MESSAGE_BYTES: usize = 512;

/// Unified error types for pagetrie.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query, zero page size).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response from the remote server.
    #[error("FETCH_FAILED: bad status {status} ({message})")]
    FetchStatus { status: u16, message: String },

    /// Transport-level HTTP failure (connect, TLS, body read).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Cache or persistence I/O failed.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),

    /// A crawl batch failed; carries the first underlying failure.
    #[error("CRAWL_FAILED: {url}: {source}")]
    CrawlFailed {
        url: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a [`Error::FetchStatus`], truncating the message on a char boundary.
    pub fn fetch_status(status: u16, message: &str) -> Self {
        let mut end = message.len().min(MAX_STATUS_MESSAGE_BYTES);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        Error::FetchStatus { status, message: message[..end].to_string() }
    }

    /// Wrap an I/O failure with the path or operation it concerns.
    pub fn storage(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Error::Storage(format!("{context}: {err}"))
    }

    /// True for network-side failures.
    pub fn is_fetch(&self) -> bool {
        match self {
            Error::FetchStatus { .. } | Error::HttpError(_) | Error::FetchTooLarge(_) => true,
            Error::CrawlFailed { source, .. } => source.is_fetch(),
            _ => false,
        }
    }

    /// True for cache or persistence failures.
    pub fn is_storage(&self) -> bool {
        match self {
            Error::Storage(_) => true,
            Error::CrawlFailed { source, .. } => source.is_storage(),
            _ => false,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::FetchStatus { .. } => -32008,
            Error::HttpError(_) => -32008,
            Error::FetchTooLarge(_) => -32007,
            Error::Storage(_) => -32002,
            Error::CrawlFailed { .. } => -32013,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::fetch_status(404, "Not Found");
        assert!(err.to_string().contains("FETCH_FAILED"));
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_fetch_status_truncates_message() {
        let long = "x".repeat(2000);
        let Error::FetchStatus { message, .. } = Error::fetch_status(500, &long) else {
            panic!("expected FetchStatus");
        };
        assert_eq!(message.len(), MAX_STATUS_MESSAGE_BYTES);
    }

    #[test]
    fn test_fetch_status_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let Error::FetchStatus { message, .. } = Error::fetch_status(500, &long) else {
            panic!("expected FetchStatus");
        };
        assert!(message.len() <= MAX_STATUS_MESSAGE_BYTES);
        assert!(message.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_classification() {
        assert!(Error::HttpError("reset".into()).is_fetch());
        assert!(Error::storage("cached/abc", "disk full").is_storage());
        assert!(!Error::InvalidInput("x".into()).is_fetch());

        let crawl = Error::CrawlFailed { url: "http://x".into(), source: Box::new(Error::fetch_status(503, "")) };
        assert!(crawl.is_fetch());
        assert!(!crawl.is_storage());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("bad".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }
}
