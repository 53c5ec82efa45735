//! Duplex (SSE) transport adapter.
//!
//! `GET /sse` opens the long-lived channel: the gateway mints a session
//! whose handle is the stream itself and announces the identifier as the
//! very first frame (an `endpoint` event, since the channel is still
//! being established when the identifier is chosen). Follow-up calls
//! arrive as `POST /messages?session=<id>`; their replies are written
//! onto the stream (the channel, not the follow-up call, is the
//! client's read side) and the POST is acknowledged with 202. Stream
//! teardown terminates the session.

use crate::mcp::http::{GatewayState, StreamTeardown, frame_stream};
use crate::mcp::protocol::{
    INVALID_REQUEST, JsonRpcRequest, JsonRpcResponse, MAX_REQUEST_BODY_SIZE,
};
use crate::mcp::session::{FRAME_CHANNEL_CAPACITY, SessionKind, SseFrame};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tokio::sync::mpsc;

/// Query parameters of a follow-up call.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Session identifier chosen when the channel was opened.
    pub session: Option<String>,
}

/// Handles `GET /sse`: mints a session bound to this stream and starts
/// pushing frames.
pub async fn open_stream(State(state): State<GatewayState>) -> Response {
    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
    let session_id = state.sessions.create(SessionKind::Duplex, Some(tx));
    tracing::info!(session_id = %session_id, "SSE connection established");

    let endpoint = SseFrame {
        event: "endpoint",
        data: format!("/messages?session={session_id}"),
    };
    let stream = frame_stream(
        state.sessions.clone(),
        session_id,
        StreamTeardown::Terminate,
        rx,
        Some(endpoint),
    );
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// Handles `POST /messages?session=<id>`: decodes one follow-up call and
/// writes the reply onto the session's stream.
///
/// An unknown identifier gets a not-found reply on the follow-up call
/// itself; open streams are unaffected. A reply that can no longer be
/// delivered (stream torn down mid-dispatch) is dropped; a terminated
/// identifier never delivers a stale result.
pub async fn post_message(
    State(state): State<GatewayState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session.filter(|id| state.sessions.contains(id)) else {
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };

    if body.len() > MAX_REQUEST_BODY_SIZE {
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
            tracing::warn!(session_id = %session_id, error = %e, "Invalid follow-up body");
            return (StatusCode::BAD_REQUEST, "Invalid JSON").into_response();
        },
    };

    let response = state.handler.handle_request(request, "sse").await;
    let frame = SseFrame {
        event: "message",
        data: response.to_json(),
    };

    match state.sessions.push(&session_id, frame).await {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Dropping reply for torn-down session");
            (StatusCode::NOT_FOUND, "Session not found").into_response()
        },
    }
}
