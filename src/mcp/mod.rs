//! MCP protocol gateway.
//!
//! Implements the Model Context Protocol server for Paperless-ngx.
//!
//! ## Features
//!
//! - **Tools**: the full document-management catalog (`search_documents`,
//!   `update_document`, `bulk_update_documents`, tag/correspondent/
//!   document-type/storage-path/custom-field/saved-view CRUD, tasks,
//!   statistics, logs)
//! - **Resources**: recent documents via `paperless://document/{id}`
//! - **Transports**: stdio, streamable HTTP with `Mcp-Session-Id`
//!   sessions, and SSE with out-of-band follow-up calls
//!
//! ## Usage
//!
//! ### Stdio Transport (Claude Desktop)
//!
//! ```bash
//! paperless-mcp serve
//! ```
//!
//! ### Claude Desktop Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "paperless": {
//!       "command": "paperless-mcp",
//!       "args": ["serve"],
//!       "env": { "PAPERLESS_URL": "...", "PAPERLESS_TOKEN": "..." }
//!     }
//!   }
//! }
//! ```

mod dispatch;
mod handler;
mod http;
mod protocol;
mod resources;
mod server;
mod session;
mod sse;
mod streamable;
mod tools;

pub use dispatch::McpMethod;
pub use handler::{DispatchResult, McpHandler, PROTOCOL_VERSION, SERVER_NAME, initialize_result};
pub use http::{ALLOWED_ORIGINS, GatewayState, router};
pub use protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    MAX_REQUEST_BODY_SIZE, METHOD_NOT_FOUND, PARSE_ERROR, SESSION_NOT_FOUND,
};
pub use resources::{ResourceContent, ResourceDefinition, ResourceExposer};
pub use server::{HttpMode, McpServer, Transport};
pub use session::{
    FRAME_CHANNEL_CAPACITY, FrameReceiver, FrameSender, Session, SessionKind, SessionRegistry,
    SseFrame,
};
pub use streamable::{PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER};
pub use tools::{ToolContent, ToolDefinition, ToolRegistry, ToolResult};
