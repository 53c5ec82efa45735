//! Stateless (streamable HTTP) transport adapter.
//!
//! Each unit of work is an independent `POST /mcp`. Session identity
//! travels in the `Mcp-Session-Id` header: `initialize` always mints a new
//! session and returns the identifier in the response headers; every other
//! method requires a registered identifier and short-circuits with a
//! protocol-level error before the tool catalog is consulted. `GET /mcp`
//! attaches an optional server-push channel to an existing session and
//! `DELETE /mcp` terminates it; the registry entry is removed before the
//! acknowledgement is sent.

use crate::mcp::handler::initialize_result;
use crate::mcp::http::{GatewayState, StreamTeardown, frame_stream};
use crate::mcp::protocol::{
    INVALID_REQUEST, JsonRpcRequest, JsonRpcResponse, MAX_REQUEST_BODY_SIZE, PARSE_ERROR,
    SESSION_NOT_FOUND,
};
use crate::mcp::session::{FRAME_CHANNEL_CAPACITY, SessionKind};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use tokio::sync::mpsc;

/// Header carrying the session identifier.
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Header carrying the negotiated protocol version.
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Handles `POST /mcp`: one decoded envelope, one reply, done.
pub async fn post_mcp(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if body.len() > MAX_REQUEST_BODY_SIZE {
        tracing::warn!(
            body_size = body.len(),
            max_size = MAX_REQUEST_BODY_SIZE,
            "Request body exceeds maximum size limit"
        );
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(JsonRpcResponse::failure(
                None,
                INVALID_REQUEST,
                format!(
                    "Request body too large: {} bytes (max: {} bytes)",
                    body.len(),
                    MAX_REQUEST_BODY_SIZE
                ),
            )),
        )
            .into_response();
    }

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                )),
            )
                .into_response();
        },
    };

    // Initialize always creates a fresh session, regardless of any
    // identifier the caller presents.
    if request.method == "initialize" {
        let session_id = state.sessions.create(SessionKind::Stateless, None);
        let protocol_version = headers
            .get(PROTOCOL_VERSION_HEADER)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(crate::mcp::handler::PROTOCOL_VERSION));

        let mut response =
            Json(JsonRpcResponse::success(request.id, initialize_result())).into_response();
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(SESSION_ID_HEADER), value);
        }
        response.headers_mut().insert(
            HeaderName::from_static(PROTOCOL_VERSION_HEADER),
            protocol_version,
        );
        return response;
    }

    // Everything else requires a registered identifier. Unknown sessions
    // are rejected, never silently re-created.
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let Some(session_id) = session_id.filter(|id| state.sessions.contains(id)) else {
        tracing::warn!(method = %request.method, "Missing or invalid session header");
        return (
            StatusCode::BAD_REQUEST,
            Json(JsonRpcResponse::failure(
                request.id,
                SESSION_NOT_FOUND,
                "Missing or invalid Mcp-Session-Id header",
            )),
        )
            .into_response();
    };

    tracing::debug!(session_id = %session_id, method = %request.method, "Dispatching stateless request");
    let response = state.handler.handle_request(request, "http").await;
    Json(response).into_response()
}

/// Handles `GET /mcp`: attaches an optional server-push stream to an
/// existing session. Nothing is currently pushed through it beyond
/// keep-alives; it exists so clients can hold a read side open.
pub async fn get_mcp(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let Some(session_id) = session_id else {
        return (
            StatusCode::BAD_REQUEST,
            "GET requires valid Mcp-Session-Id header",
        )
            .into_response();
    };

    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
    let epoch = match state.sessions.attach_channel(&session_id, tx) {
        Ok(epoch) => epoch,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                "GET requires valid Mcp-Session-Id header",
            )
                .into_response();
        },
    };

    tracing::info!(session_id = %session_id, "Push stream opened");
    let stream = frame_stream(
        state.sessions.clone(),
        session_id,
        StreamTeardown::Detach(epoch),
        rx,
        None,
    );
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// Handles `DELETE /mcp`: synchronous session termination. The registry
/// entry is removed before the success acknowledgement is sent; a second
/// delete reports not-found.
pub async fn delete_mcp(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match session_id {
        Some(id) if state.sessions.terminate(&id).is_ok() => {
            (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response()
        },
        _ => (StatusCode::NOT_FOUND, "Session not found").into_response(),
    }
}
