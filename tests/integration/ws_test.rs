//! Integration tests for the WebSocket handshake.

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use crate::helpers::TestApp;

/// Builds a GET request carrying valid WebSocket upgrade headers.
fn upgrade_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("connection", "upgrade")
        .header("upgrade", "websocket")
        .header("sec-websocket-version", "13")
        .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn test_ws_upgrade_without_token_rejected() {
    let app = TestApp::new();

    // Missing `token` query parameter fails extraction before any upgrade.
    let response = app
        .router
        .clone()
        .oneshot(upgrade_request("/ws"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ws_upgrade_with_invalid_token_rejected() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(upgrade_request("/ws?token=not-a-jwt"))
        .await
        .expect("response");

    // Authentication happens before the upgrade completes.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ws_plain_get_not_upgraded() {
    let app = TestApp::new();

    // No upgrade headers at all.
    let response = app.request("GET", "/ws?token=whatever", None, None).await;

    assert!(
        response.status == StatusCode::BAD_REQUEST
            || response.status == StatusCode::UPGRADE_REQUIRED,
        "Expected 400 or 426, got {}",
        response.status
    );
}
