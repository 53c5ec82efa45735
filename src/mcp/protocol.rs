//! JSON-RPC 2.0 envelope types and error codes.
//!
//! The envelope layer is shared by every transport adapter. Protocol-level
//! errors (parse failures, unknown methods, missing sessions) use the
//! error object below; tool execution failures never do: they travel as
//! normal results flagged with `isError`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parse error: the request body is not valid JSON.
pub const PARSE_ERROR: i32 = -32700;

/// Invalid request: well-formed JSON that violates envelope constraints
/// (for example an oversized body).
pub const INVALID_REQUEST: i32 = -32600;

/// Method not found.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Invalid or missing params.
pub const INVALID_PARAMS: i32 = -32602;

/// Internal error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Missing or invalid session identifier.
pub const SESSION_NOT_FOUND: i32 = -32000;

/// Maximum request body size (1 MiB). Oversized envelopes are rejected
/// before parsing on every transport.
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// JSON-RPC request envelope.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    /// Caller-assigned correlation identifier, opaque to the gateway.
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    pub params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: String,
    /// Correlation identifier echoed from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Successful result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Protocol-level error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Builds a successful response.
    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Serializes the response to a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let request: JsonRpcRequest = serde_json::from_str(raw).expect("parse");
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Some(json!(1)));
        assert!(request.params.is_none());
    }

    #[test]
    fn test_success_response_shape() {
        let response = JsonRpcResponse::success(Some(json!(7)), json!({"ok": true}));
        let value: Value = serde_json::from_str(&response.to_json()).expect("round trip");
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["result"]["ok"], true);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_response_shape() {
        let response = JsonRpcResponse::failure(None, SESSION_NOT_FOUND, "no such session");
        let value: Value = serde_json::from_str(&response.to_json()).expect("round trip");
        assert_eq!(value["error"]["code"], SESSION_NOT_FOUND);
        assert_eq!(value["error"]["message"], "no such session");
        assert!(value.get("result").is_none());
    }
}
