//! HTTP gateway shared by both transport adapters.
//!
//! Builds the axum router, applies the cross-origin posture, and owns the
//! SSE stream plumbing. Cross-origin requests are permitted but only an
//! explicit allow-list of origins is echoed back (credential-eligible);
//! every other well-formed request is still served with a wildcard origin.
//! The boundary is advisory exposure control, not authorization.

use crate::mcp::handler::McpHandler;
use crate::mcp::session::{FrameReceiver, SessionRegistry, SseFrame};
use crate::mcp::server::HttpMode;
use crate::mcp::{sse, streamable};
use axum::Router;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue, ORIGIN,
};
use axum::middleware::Next;
use axum::response::sse::Event;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Origins eligible for credentialed cross-origin access. All other
/// origins are served with a wildcard.
pub const ALLOWED_ORIGINS: &[&str] = &["https://chatgpt.com", "https://chat.openai.com"];

/// Shared state for the HTTP gateway.
#[derive(Clone)]
pub struct GatewayState {
    /// Transport-independent request handler.
    pub handler: Arc<McpHandler>,
    /// Session registry shared by both adapters.
    pub sessions: SessionRegistry,
}

/// Builds the gateway router for the selected protocol mode.
#[must_use]
pub fn router(state: GatewayState, mode: HttpMode) -> Router {
    let mut router = Router::new().route("/health", get(health));

    if mode.stateless_enabled() {
        router = router.route(
            "/mcp",
            axum::routing::post(streamable::post_mcp)
                .get(streamable::get_mcp)
                .delete(streamable::delete_mcp)
                .options(preflight),
        );
    }

    if mode.duplex_enabled() {
        router = router
            .route("/sse", get(sse::open_stream))
            .route(
                "/messages",
                axum::routing::post(sse::post_message).options(preflight),
            );
    }

    router
        .layer(axum::middleware::from_fn(apply_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness endpoint: a fixed payload, unconditionally.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "server": crate::mcp::handler::SERVER_NAME
    }))
}

/// Answers cross-origin preflight.
async fn preflight() -> impl IntoResponse {
    (
        axum::http::StatusCode::NO_CONTENT,
        [
            (
                axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
            ),
            (
                axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, Mcp-Session-Id, MCP-Protocol-Version"),
            ),
            (
                axum::http::header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static("86400"),
            ),
        ],
    )
}

/// Resolves the `Access-Control-Allow-Origin` value for a request origin.
#[must_use]
pub fn allow_origin_value(origin: Option<&HeaderValue>) -> HeaderValue {
    match origin.and_then(|v| v.to_str().ok()) {
        Some(origin) if ALLOWED_ORIGINS.contains(&origin) => {
            HeaderValue::from_str(origin).unwrap_or_else(|_| HeaderValue::from_static("*"))
        },
        _ => HeaderValue::from_static("*"),
    }
}

/// Applies the origin-aware CORS headers to every response.
async fn apply_cors(request: Request, next: Next) -> Response {
    let allow = allow_origin_value(request.headers().get(ORIGIN));
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow);
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Mcp-Session-Id, MCP-Protocol-Version"),
    );
    response
}

/// What to do with the session when its event stream is torn down.
#[derive(Debug, Clone, Copy)]
pub enum StreamTeardown {
    /// Detach the push channel (epoch-guarded); the session survives.
    Detach(u64),
    /// Terminate the session; the stream was the session.
    Terminate,
}

/// Removes or detaches the session when the stream is dropped, covering
/// client disconnects that never send an explicit termination.
struct StreamGuard {
    registry: SessionRegistry,
    session_id: String,
    teardown: StreamTeardown,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        match self.teardown {
            StreamTeardown::Detach(epoch) => {
                self.registry.detach_channel(&self.session_id, epoch);
                tracing::debug!(session_id = %self.session_id, "Push channel detached");
            },
            StreamTeardown::Terminate => {
                if self.registry.terminate(&self.session_id).is_ok() {
                    tracing::info!(session_id = %self.session_id, "Stream closed, session terminated");
                }
            },
        }
    }
}

/// Builds the SSE event stream for a session.
///
/// Yields `first` (if any) before draining the push channel, so the
/// session identifier is always the first frame a duplex client sees.
/// Dropping the stream triggers the configured teardown.
pub fn frame_stream(
    registry: SessionRegistry,
    session_id: String,
    teardown: StreamTeardown,
    mut rx: FrameReceiver,
    first: Option<SseFrame>,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    async_stream::stream! {
        let _guard = StreamGuard {
            registry,
            session_id,
            teardown,
        };

        if let Some(frame) = first {
            yield Ok(to_event(frame));
        }

        while let Some(frame) = rx.recv().await {
            yield Ok(to_event(frame));
        }
    }
}

/// Converts a push frame to an SSE event.
fn to_event(frame: SseFrame) -> Event {
    Event::default().event(frame.event).data(frame.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origin_is_echoed() {
        let origin = HeaderValue::from_static("https://chatgpt.com");
        let value = allow_origin_value(Some(&origin));
        assert_eq!(value, "https://chatgpt.com");
    }

    #[test]
    fn test_unknown_origin_gets_wildcard() {
        let origin = HeaderValue::from_static("https://evil.example");
        assert_eq!(allow_origin_value(Some(&origin)), "*");
        assert_eq!(allow_origin_value(None), "*");
    }
}
