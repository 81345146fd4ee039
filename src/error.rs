//! Error types for the MCP server.

use thiserror::Error;

/// Result type alias for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors surfaced by the MCP server.
///
/// Tool-level failures (everything except the protocol variants) are reported
/// back to the agent host as a failed tool call; none are retried.
#[derive(Debug, Error)]
pub enum McpError {
    /// A required tool argument was absent or null.
    #[error("missing required argument: {0}")]
    MissingArg(String),

    /// A tool argument did not match its declared schema.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Startup configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Mobi answered with a non-success status.
    #[error("HTTP {status} {reason}: {body}")]
    Http {
        /// Numeric status code
        status: u16,
        /// Canonical reason phrase, if known
        reason: String,
        /// Leading portion of the response body
        body: String,
    },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response claimed to be JSON but could not be decoded.
    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    /// JSON-RPC message could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// JSON-RPC error code used when this error is reported at the protocol
    /// level rather than as a failed tool result.
    pub fn code(&self) -> i64 {
        match self {
            McpError::Json(_) => -32700,
            McpError::MissingArg(_) | McpError::InvalidArg { .. } | McpError::UnknownTool(_) => {
                -32602
            }
            _ => -32603,
        }
    }

    /// Whether the error was raised before any request reached Mobi.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            McpError::MissingArg(_) | McpError::InvalidArg { .. } | McpError::UnknownTool(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_includes_status() {
        let err = McpError::Http {
            status: 404,
            reason: "Not Found".to_string(),
            body: "Record not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Record not found"));
    }

    #[test]
    fn test_validation_errors_map_to_invalid_params() {
        assert_eq!(McpError::MissingArg("title".into()).code(), -32602);
        assert_eq!(McpError::UnknownTool("nope".into()).code(), -32602);
        assert!(McpError::MissingArg("title".into()).is_validation());
    }

    #[test]
    fn test_upstream_errors_are_not_validation() {
        let err = McpError::Http {
            status: 500,
            reason: "Internal Server Error".to_string(),
            body: String::new(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.code(), -32603);
    }
}
