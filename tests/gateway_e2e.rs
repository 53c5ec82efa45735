//! Protocol gateway end-to-end tests.
//!
//! Exercises the HTTP gateway through the axum router, focusing on:
//! - Session lifecycle (create / use / terminate) on the stateless adapter
//! - Rejection of missing, invalid, and terminated session identifiers
//! - Duplex follow-up delivery onto the event stream
//! - Cross-origin posture (allow-listed echo vs wildcard)
//! - Envelope-level guards (parse errors, oversized bodies)
//!
//! No Paperless instance is required: every request here stays inside the
//! gateway or degrades the way an unreachable repository should.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use paperless_mcp::config::PaperlessConfig;
use paperless_mcp::mcp::{
    GatewayState, HttpMode, McpHandler, SessionKind, SessionRegistry, router,
};
use paperless_mcp::paperless::PaperlessClient;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const SESSION_HEADER: &str = "mcp-session-id";

/// Builds a gateway whose upstream is a closed port: repository calls
/// fail fast, gateway behavior is unaffected.
fn test_gateway(mode: HttpMode) -> (Router, SessionRegistry) {
    let config = PaperlessConfig::new("http://127.0.0.1:9", "token-1234").expect("config");
    let client = Arc::new(PaperlessClient::new(&config).expect("client"));
    let state = GatewayState {
        handler: Arc::new(McpHandler::new(client)),
        sessions: SessionRegistry::new(),
    };
    let sessions = state.sessions.clone();
    (router(state, mode), sessions)
}

async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
}

fn rpc(method: &str) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "method": method}).to_string()
}

async fn initialize(app: &Router) -> String {
    let (status, headers, body) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from(rpc("initialize")))
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["serverInfo"]["name"], "paperless-mcp");
    headers
        .get(SESSION_HEADER)
        .expect("session header")
        .to_str()
        .expect("utf-8")
        .to_string()
}

mod stateless_lifecycle {
    use super::*;

    #[tokio::test]
    async fn initialize_returns_unique_session_ids() {
        let (app, sessions) = test_gateway(HttpMode::Stateless);

        let first = initialize(&app).await;
        let second = initialize(&app).await;

        assert_ne!(first, second);
        assert!(sessions.contains(&first));
        assert!(sessions.contains(&second));
    }

    #[tokio::test]
    async fn follow_up_with_valid_session_is_served() {
        let (app, _) = test_gateway(HttpMode::Stateless);
        let session_id = initialize(&app).await;

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header(SESSION_HEADER, &session_id)
                .body(Body::from(rpc("tools/list")))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let tools = body["result"]["tools"].as_array().expect("tools");
        assert!(tools.iter().any(|t| t["name"] == "search_documents"));
    }

    #[tokio::test]
    async fn missing_session_header_is_rejected_before_dispatch() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .body(Body::from(rpc("tools/list")))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32000);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected_not_recreated() {
        let (app, sessions) = test_gateway(HttpMode::Stateless);

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header(SESSION_HEADER, "mcp-0-doesnotexist")
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32000);
        // Rejection must not register the identifier.
        assert!(!sessions.contains("mcp-0-doesnotexist"));
    }

    #[tokio::test]
    async fn delete_terminates_then_reports_not_found() {
        let (app, sessions) = test_gateway(HttpMode::Stateless);
        let session_id = initialize(&app).await;

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/mcp")
                .header(SESSION_HEADER, &session_id)
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(!sessions.contains(&session_id));

        // Terminating twice must report not-found, not succeed silently.
        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/mcp")
                .header(SESSION_HEADER, &session_id)
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // A terminated identifier is dead for follow-ups too.
        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header(SESSION_HEADER, &session_id)
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32000);
    }

    #[tokio::test]
    async fn push_channel_requires_valid_session() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/mcp")
                    .header(SESSION_HEADER, "mcp-0-doesnotexist")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn push_channel_opens_for_valid_session() {
        let (app, _) = test_gateway(HttpMode::Stateless);
        let session_id = initialize(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/mcp")
                    .header(SESSION_HEADER, &session_id)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .expect("content type")
            .to_str()
            .expect("utf-8");
        assert!(content_type.starts_with("text/event-stream"));
    }
}

mod envelope_guards {
    use super::*;

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .body(Body::from("not json"))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let huge = "x".repeat(1024 * 1024 + 1);
        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .body(Body::from(huge))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], -32600);
    }
}

mod cross_origin {
    use super::*;

    #[tokio::test]
    async fn allow_listed_origin_is_echoed() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let (_, headers, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("origin", "https://chatgpt.com")
                .body(Body::from(rpc("initialize")))
                .expect("request"),
        )
        .await;

        assert_eq!(
            headers.get("access-control-allow-origin").expect("header"),
            "https://chatgpt.com"
        );
    }

    #[tokio::test]
    async fn unknown_origin_is_still_served_with_wildcard() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let (status, headers, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("origin", "https://unknown.example")
                .body(Body::from(rpc("initialize")))
                .expect("request"),
        )
        .await;

        // Permissive but origin-aware: the request is served either way.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get("access-control-allow-origin").expect("header"),
            "*"
        );
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/mcp")
                    .header("origin", "https://chatgpt.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .expect("methods")
            .to_str()
            .expect("utf-8");
        assert!(methods.contains("DELETE"));
    }
}

mod duplex {
    use super::*;
    use paperless_mcp::mcp::FRAME_CHANNEL_CAPACITY;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn stream_opens_with_event_stream_content_type() {
        let (app, _) = test_gateway(HttpMode::Duplex);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/sse")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .expect("content type")
            .to_str()
            .expect("utf-8");
        assert!(content_type.starts_with("text/event-stream"));
    }

    #[tokio::test]
    async fn follow_up_without_session_is_not_found() {
        let (app, _) = test_gateway(HttpMode::Duplex);

        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/messages")
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/messages?session=mcp-0-doesnotexist")
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn follow_up_reply_lands_on_the_stream() {
        let (app, sessions) = test_gateway(HttpMode::Duplex);

        // Register a duplex session directly so the receiving half stays
        // in the test's hands.
        let (tx, mut rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let session_id = sessions.create(SessionKind::Duplex, Some(tx));

        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri(format!("/messages?session={session_id}"))
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;

        // The POST itself is only acknowledged; the reply travels on the
        // stream.
        assert_eq!(status, StatusCode::ACCEPTED);

        let frame = rx.recv().await.expect("frame");
        assert_eq!(frame.event, "message");
        let reply: Value = serde_json::from_str(&frame.data).expect("reply json");
        assert_eq!(reply["id"], 1);
        assert!(reply["result"].is_object());
    }

    #[tokio::test]
    async fn invalid_follow_up_body_is_bad_request() {
        let (app, sessions) = test_gateway(HttpMode::Duplex);
        let (tx, _rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let session_id = sessions.create(SessionKind::Duplex, Some(tx));

        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri(format!("/messages?session={session_id}"))
                .body(Body::from("not json"))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn terminated_session_never_delivers_a_stale_reply() {
        let (app, sessions) = test_gateway(HttpMode::Duplex);
        let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let session_id = sessions.create(SessionKind::Duplex, Some(tx));

        // Client disconnect: receiver dropped, session torn down.
        drop(rx);
        sessions.terminate(&session_id).expect("terminate");

        let (status, _, _) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri(format!("/messages?session={session_id}"))
                .body(Body::from(rpc("ping")))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn health_is_served_unconditionally() {
        for mode in [HttpMode::Stateless, HttpMode::Duplex, HttpMode::Both] {
            let (app, _) = test_gateway(mode);
            let (status, _, body) = send(
                &app,
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["server"], "paperless-mcp");
        }
    }

    #[tokio::test]
    async fn stateless_mode_does_not_mount_duplex_routes() {
        let (app, _) = test_gateway(HttpMode::Stateless);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/sse")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplex_mode_does_not_mount_stateless_routes() {
        let (app, _) = test_gateway(HttpMode::Duplex);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::from(rpc("initialize")))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
