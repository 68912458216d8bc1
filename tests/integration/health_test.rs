//! Integration tests for health endpoints.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.body.get("data").unwrap();
    assert_eq!(data.get("status").unwrap().as_str().unwrap(), "ok");
    assert!(data.get("version").is_some());
}

#[tokio::test]
async fn test_detailed_health_reports_database_state() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.body.get("data").unwrap();
    // The test pool points at an unreachable address.
    assert_eq!(data.get("database").unwrap().as_str().unwrap(), "unavailable");
    assert_eq!(data.get("ws_connections").unwrap().as_u64().unwrap(), 0);
    assert_eq!(data.get("online_users").unwrap().as_u64().unwrap(), 0);
}
