//! MCP server setup and lifecycle.
//!
//! One dispatch core behind three transports:
//!
//! - **Stdio**: newline-delimited JSON-RPC on stdin/stdout (default for
//!   desktop assistants). Logging goes to stderr only.
//! - **HTTP**: the protocol gateway, serving the stateless (`/mcp`) and
//!   duplex (`/sse` + `/messages`) adapters per the selected mode, plus
//!   `/health`.

use crate::config::PaperlessConfig;
use crate::mcp::handler::McpHandler;
use crate::mcp::http::{self, GatewayState};
use crate::mcp::session::SessionRegistry;
use crate::paperless::PaperlessClient;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Default HTTP port.
const DEFAULT_PORT: u16 = 3000;

/// Transport type for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Standard input/output (default for Claude Desktop).
    #[default]
    Stdio,
    /// HTTP transport.
    Http,
}

impl Transport {
    /// Parses a transport string, defaulting to stdio.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "http" => Self::Http,
            _ => Self::Stdio,
        }
    }
}

/// Which HTTP adapters to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMode {
    /// Only the stateless (streamable HTTP) adapter.
    Stateless,
    /// Only the duplex (SSE) adapter.
    Duplex,
    /// Both adapters.
    #[default]
    Both,
}

impl HttpMode {
    /// Parses a mode string, defaulting to both.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "stateless" => Self::Stateless,
            "duplex" => Self::Duplex,
            _ => Self::Both,
        }
    }

    /// Whether the stateless adapter is mounted.
    #[must_use]
    pub const fn stateless_enabled(self) -> bool {
        matches!(self, Self::Stateless | Self::Both)
    }

    /// Whether the duplex adapter is mounted.
    #[must_use]
    pub const fn duplex_enabled(self) -> bool {
        matches!(self, Self::Duplex | Self::Both)
    }

    /// Metric/log label for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stateless => "stateless",
            Self::Duplex => "duplex",
            Self::Both => "both",
        }
    }
}

/// MCP server for Paperless-ngx.
pub struct McpServer {
    /// Shared request handler.
    handler: Arc<McpHandler>,
    /// Transport type.
    transport: Transport,
    /// HTTP protocol mode.
    http_mode: HttpMode,
    /// HTTP port (if using HTTP transport).
    port: u16,
}

impl McpServer {
    /// Creates a new MCP server.
    ///
    /// The repository client is constructed once here and shared
    /// read-only by every session.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository client cannot be built from the
    /// configuration.
    pub fn new(config: &PaperlessConfig) -> Result<Self> {
        let client = Arc::new(PaperlessClient::new(config)?);

        Ok(Self {
            handler: Arc::new(McpHandler::new(client)),
            transport: Transport::Stdio,
            http_mode: HttpMode::Both,
            port: DEFAULT_PORT,
        })
    }

    /// Sets the transport type.
    #[must_use]
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the HTTP protocol mode.
    #[must_use]
    pub const fn with_http_mode(mut self, mode: HttpMode) -> Self {
        self.http_mode = mode;
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Starts the MCP server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start.
    pub async fn start(&self) -> Result<()> {
        match self.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Runs the server over stdio.
    async fn run_stdio(&self) -> Result<()> {
        tracing::info!("Paperless MCP server running on stdio");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await.map_err(|e| Error::OperationFailed {
            operation: "read_stdin".to_string(),
            cause: e.to_string(),
        })? {
            if line.is_empty() {
                continue;
            }

            let response = self.handler.handle_message(&line, "stdio").await;
            let mut payload = response.to_json();
            payload.push('\n');

            stdout
                .write_all(payload.as_bytes())
                .await
                .map_err(|e| write_error(&e))?;
            stdout.flush().await.map_err(|e| write_error(&e))?;
        }

        Ok(())
    }

    /// Runs the protocol gateway over HTTP.
    async fn run_http(&self) -> Result<()> {
        let state = GatewayState {
            handler: Arc::clone(&self.handler),
            sessions: SessionRegistry::new(),
        };
        let app = http::router(state, self.http_mode);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!(
            port = self.port,
            mode = self.http_mode.as_str(),
            "Starting MCP HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "bind".to_string(),
                cause: e.to_string(),
            })?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "serve".to_string(),
                cause: e.to_string(),
            })
    }
}

/// Maps a stdout failure to an operation error.
fn write_error(e: &std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "write_stdout".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_server() -> McpServer {
        let config = PaperlessConfig::new("http://127.0.0.1:9", "token-1234").expect("config");
        McpServer::new(&config).expect("server")
    }

    #[test]
    fn test_mcp_server_creation() {
        let server = test_server();
        assert_eq!(server.transport, Transport::Stdio);
        assert_eq!(server.http_mode, HttpMode::Both);
        assert_eq!(server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_with_transport() {
        let server = test_server()
            .with_transport(Transport::Http)
            .with_http_mode(HttpMode::Stateless)
            .with_port(8080);
        assert_eq!(server.transport, Transport::Http);
        assert_eq!(server.http_mode, HttpMode::Stateless);
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_transport_parse() {
        assert_eq!(Transport::parse("http"), Transport::Http);
        assert_eq!(Transport::parse("HTTP"), Transport::Http);
        assert_eq!(Transport::parse("stdio"), Transport::Stdio);
        assert_eq!(Transport::parse("anything"), Transport::Stdio);
    }

    #[test]
    fn test_http_mode_parse() {
        assert_eq!(HttpMode::parse("stateless"), HttpMode::Stateless);
        assert_eq!(HttpMode::parse("duplex"), HttpMode::Duplex);
        assert_eq!(HttpMode::parse("both"), HttpMode::Both);
        assert_eq!(HttpMode::parse("anything"), HttpMode::Both);
    }

    #[test]
    fn test_http_mode_adapters() {
        assert!(HttpMode::Both.stateless_enabled());
        assert!(HttpMode::Both.duplex_enabled());
        assert!(HttpMode::Stateless.stateless_enabled());
        assert!(!HttpMode::Stateless.duplex_enabled());
        assert!(HttpMode::Duplex.duplex_enabled());
        assert!(!HttpMode::Duplex.stateless_enabled());
    }
}
