//! Shared MCP request handling.
//!
//! One dispatch core behind every transport adapter: the envelope is
//! decoded by the adapter, handed here, and the reply is routed back over
//! whatever channel the adapter owns. Session bookkeeping stays in the
//! adapters: by the time a request reaches this handler it is already
//! bound to a valid session (or needs none, as on stdio).

use crate::mcp::dispatch::McpMethod;
use crate::mcp::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JsonRpcRequest, JsonRpcResponse,
    MAX_REQUEST_BODY_SIZE, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::mcp::resources::ResourceExposer;
use crate::mcp::tools::ToolRegistry;
use crate::paperless::PaperlessClient;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info_span};

/// MCP protocol version.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name advertised during initialization.
pub const SERVER_NAME: &str = "paperless-mcp";

/// Result type for method dispatch.
pub type DispatchResult = std::result::Result<Value, (i32, String)>;

/// Transport-independent MCP request handler.
pub struct McpHandler {
    /// Tool registry.
    tools: ToolRegistry,
    /// Resource exposer.
    resources: ResourceExposer,
}

impl McpHandler {
    /// Creates a handler backed by the shared repository client.
    #[must_use]
    pub fn new(client: Arc<PaperlessClient>) -> Self {
        Self {
            tools: ToolRegistry::new(Arc::clone(&client)),
            resources: ResourceExposer::new(client),
        }
    }

    /// Handles one raw message: size check, parse, dispatch.
    pub async fn handle_message(&self, raw: &str, transport: &'static str) -> JsonRpcResponse {
        if raw.len() > MAX_REQUEST_BODY_SIZE {
            tracing::warn!(
                request_size = raw.len(),
                max_size = MAX_REQUEST_BODY_SIZE,
                "Request exceeds maximum size limit"
            );
            return JsonRpcResponse::failure(
                None,
                INVALID_REQUEST,
                format!(
                    "Request too large: {} bytes (max: {} bytes)",
                    raw.len(),
                    MAX_REQUEST_BODY_SIZE
                ),
            );
        }

        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request, transport).await,
            Err(e) => {
                metrics::counter!(
                    "mcp_requests_total",
                    "method" => "parse_error",
                    "transport" => transport,
                    "status" => "error"
                )
                .increment(1);
                JsonRpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {e}"))
            },
        }
    }

    /// Handles a decoded JSON-RPC request.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        transport: &'static str,
    ) -> JsonRpcResponse {
        let start = Instant::now();
        let method = request.method.clone();
        let span = info_span!(
            "mcp.request",
            transport,
            rpc.method = %method,
            status = tracing::field::Empty
        );

        let result = async {
            tracing::info!(method = %method, transport, "Processing MCP request");
            self.dispatch_method(&request.method, request.params).await
        }
        .instrument(span.clone())
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        span.record("status", status);
        metrics::counter!(
            "mcp_requests_total",
            "method" => method.clone(),
            "transport" => transport,
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "mcp_request_duration_ms",
            "method" => method,
            "transport" => transport
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err((code, message)) => JsonRpcResponse::failure(request.id, code, message),
        }
    }

    /// Dispatches a method call using the command pattern.
    pub async fn dispatch_method(&self, method: &str, params: Option<Value>) -> DispatchResult {
        match McpMethod::from(method) {
            McpMethod::Initialize => Ok(initialize_result()),
            McpMethod::ListTools => Ok(self.handle_list_tools()),
            McpMethod::CallTool => self.handle_call_tool(params).await,
            McpMethod::ListResources => Ok(self.handle_list_resources().await),
            McpMethod::ReadResource => self.handle_read_resource(params).await,
            McpMethod::Ping => Ok(serde_json::json!({})),
            McpMethod::Unknown(name) => Err((METHOD_NOT_FOUND, format!("Method not found: {name}"))),
        }
    }

    /// Handles tools/list.
    fn handle_list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .list_tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        serde_json::json!({ "tools": tools })
    }

    /// Handles tools/call.
    ///
    /// Every outcome is a normal result: validation failures, upstream
    /// failures, and unknown tool names become `isError` payloads so the
    /// caller always receives textual content.
    async fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((INVALID_PARAMS, "Missing params".to_string()))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?
            .to_string();
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let span = info_span!("mcp.tool.call", tool.name = %name);
        let start = Instant::now();

        let (payload, status) = match self
            .tools
            .execute(&name, arguments)
            .instrument(span)
            .await
        {
            Ok(result) => {
                let status = if result.is_error { "error" } else { "success" };
                (
                    serde_json::json!({
                        "content": result.content,
                        "isError": result.is_error
                    }),
                    status,
                )
            },
            Err(e) => (
                serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": format!("Error executing tool {name}: {e}")
                    }],
                    "isError": true
                }),
                "error",
            ),
        };

        metrics::counter!(
            "mcp_tool_calls_total",
            "tool" => name.clone(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "mcp_tool_duration_ms",
            "tool" => name,
            "status" => status
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(payload)
    }

    /// Handles resources/list.
    async fn handle_list_resources(&self) -> Value {
        let resources: Vec<Value> = self
            .resources
            .list_resources()
            .await
            .iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect();

        serde_json::json!({ "resources": resources })
    }

    /// Handles resources/read.
    async fn handle_read_resource(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((INVALID_PARAMS, "Missing params".to_string()))?;

        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or((INVALID_PARAMS, "Missing resource URI".to_string()))?;

        match self.resources.read_resource(uri).await {
            Ok(content) => Ok(serde_json::json!({
                "contents": [{
                    "uri": content.uri,
                    "mimeType": content.mime_type,
                    "text": content.text
                }]
            })),
            Err(e @ crate::Error::InvalidInput(_)) => Err((INVALID_PARAMS, e.to_string())),
            Err(e) => Err((INTERNAL_ERROR, e.to_string())),
        }
    }
}

/// Builds the `initialize` result payload.
#[must_use]
pub fn initialize_result() -> Value {
    serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaperlessConfig;

    fn test_handler() -> McpHandler {
        let config = PaperlessConfig::new("http://127.0.0.1:9", "token-1234").expect("config");
        let client = Arc::new(PaperlessClient::new(&config).expect("client"));
        McpHandler::new(client)
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let handler = test_handler();
        let response = handler
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
                "stdio",
            )
            .await;

        let raw = response.to_json();
        assert!(raw.contains("protocolVersion"));
        assert!(raw.contains(PROTOCOL_VERSION));
        assert!(raw.contains(SERVER_NAME));
    }

    #[tokio::test]
    async fn test_handle_list_tools() {
        let handler = test_handler();
        let response = handler
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#, "stdio")
            .await;

        let raw = response.to_json();
        assert!(raw.contains("search_documents"));
        assert!(raw.contains("bulk_update_documents"));
        assert!(raw.contains("inputSchema"));
    }

    #[tokio::test]
    async fn test_handle_ping() {
        let handler = test_handler();
        let response = handler
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "stdio")
            .await;

        assert!(response.to_json().contains("result"));
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let handler = test_handler();
        let response = handler
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"prompts/list"}"#,
                "stdio",
            )
            .await;

        let raw = response.to_json();
        assert!(raw.contains("error"));
        assert!(raw.contains("-32601"));
    }

    #[tokio::test]
    async fn test_handle_parse_error() {
        let handler = test_handler();
        let response = handler.handle_message("not valid json", "stdio").await;

        let raw = response.to_json();
        assert!(raw.contains("error"));
        assert!(raw.contains("-32700"));
    }

    #[tokio::test]
    async fn test_handle_oversized_request() {
        let handler = test_handler();
        let raw = "x".repeat(MAX_REQUEST_BODY_SIZE + 1);
        let response = handler.handle_message(&raw, "stdio").await;

        assert!(response.to_json().contains("-32600"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_failure_not_protocol_error() {
        let handler = test_handler();
        let response = handler
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"does_not_exist","arguments":{}}}"#,
                "stdio",
            )
            .await;

        let value: Value = serde_json::from_str(&response.to_json()).expect("json");
        // Must be a success envelope with an isError payload.
        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["isError"], true);
        let text = value["result"]["content"][0]["text"]
            .as_str()
            .expect("text");
        assert!(text.contains("Unknown tool: does_not_exist"));
    }

    #[tokio::test]
    async fn test_missing_params_is_invalid_params() {
        let handler = test_handler();
        let response = handler
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call"}"#, "stdio")
            .await;

        assert!(response.to_json().contains("-32602"));
    }

    #[tokio::test]
    async fn test_malformed_resource_uri_is_invalid_params() {
        let handler = test_handler();
        let response = handler
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"resources/read","params":{"uri":"foo://bar"}}"#,
                "stdio",
            )
            .await;

        assert!(response.to_json().contains("-32602"));
    }

    #[tokio::test]
    async fn test_list_resources_degrades_when_unreachable() {
        let handler = test_handler();
        let response = handler
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#,
                "stdio",
            )
            .await;

        let value: Value = serde_json::from_str(&response.to_json()).expect("json");
        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["resources"], serde_json::json!([]));
    }
}
