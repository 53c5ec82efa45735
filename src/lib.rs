//! # paperless-mcp
//!
//! A Model Context Protocol server for Paperless-ngx document management.
//!
//! paperless-mcp exposes a Paperless-ngx document archive to AI assistants
//! through the MCP tool-calling protocol. Tool invocations are translated
//! into calls against the Paperless REST API and results are returned as
//! text content.
//!
//! ## Features
//!
//! - Full document, tag, correspondent, document type, storage path,
//!   custom field, and saved view management (~40 tools)
//! - Recent documents exposed as readable `paperless://document/{id}` resources
//! - Three transports: stdio, streamable HTTP (session header), and SSE
//!
//! ## Example
//!
//! ```rust,ignore
//! use paperless_mcp::config::PaperlessConfig;
//! use paperless_mcp::mcp::{McpServer, Transport};
//!
//! let config = PaperlessConfig::from_env()?;
//! let server = McpServer::new(config)?.with_transport(Transport::Stdio);
//! server.start().await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod mcp;
pub mod paperless;

// Re-exports for convenience
pub use config::PaperlessConfig;
pub use mcp::{McpServer, Transport};
pub use paperless::PaperlessClient;

/// Error type for paperless-mcp operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Tool arguments fail validation, unknown tool names, malformed resource URIs |
/// | `SessionNotFound` | A session identifier is missing, unregistered, or already terminated |
/// | `Upstream` | The Paperless API returns a non-2xx status, times out, or is unreachable |
/// | `OperationFailed` | Local I/O errors (stdio transport, listener binding) |
/// | `MissingConfiguration` | Required configuration such as `PAPERLESS_TOKEN` is absent at startup |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Tool arguments fail deserialization against their schema
    /// - An unknown tool name is dispatched
    /// - A resource URI has a malformed scheme or a non-numeric id
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session identifier was not recognized.
    ///
    /// Raised when:
    /// - A stateless request presents an unregistered `Mcp-Session-Id`
    /// - A duplex follow-up call references an unknown session
    /// - A session is terminated twice
    ///
    /// Terminated identifiers are never matched again; reuse is rejected,
    /// not treated as a fresh create.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The Paperless repository rejected or failed a request.
    ///
    /// Raised when:
    /// - The API returns a non-2xx status
    /// - The request times out or the host is unreachable
    /// - The response body cannot be decoded
    #[error("paperless request '{operation}' failed: {cause}")]
    Upstream {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A local operation failed.
    ///
    /// Raised when:
    /// - stdio reads or writes fail
    /// - The HTTP listener cannot bind
    /// - A push channel write fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Required configuration is missing.
    ///
    /// Raised at startup when `PAPERLESS_TOKEN` (or another required
    /// setting) is absent. This is fatal: the process exits non-zero
    /// rather than starting half-configured.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
}

/// Result type alias for paperless-mcp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Used for session identifier generation and request timing. Uses
/// `SystemTime::now()` with fallback to 0 if the system clock is before
/// the Unix epoch.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::SessionNotFound("mcp-123-abc".to_string());
        assert_eq!(err.to_string(), "session not found: mcp-123-abc");

        let err = Error::Upstream {
            operation: "search_documents".to_string(),
            cause: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "paperless request 'search_documents' failed: connection refused"
        );

        let err = Error::MissingConfiguration("PAPERLESS_TOKEN".to_string());
        assert_eq!(err.to_string(), "missing configuration: PAPERLESS_TOKEN");
    }

    #[test]
    fn test_current_timestamp_ms() {
        let ts = current_timestamp_ms();
        assert!(ts > 0);
    }
}
