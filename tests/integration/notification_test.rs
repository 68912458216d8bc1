//! Integration tests for notification REST endpoints: authentication,
//! authorization, and request validation at the HTTP boundary.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use learnhub_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_list_requires_authentication() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body.get("error").unwrap().as_str().unwrap(),
        "UNAUTHORIZED"
    );
}

#[tokio::test]
async fn test_malformed_bearer_rejected() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/notifications/unread-count", Some("garbage"), None)
        .await;

    // "Bearer " prefix missing entirely, header still supplied.
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutations_require_authentication() {
    let app = TestApp::new();
    let id = Uuid::new_v4();

    let response = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("PUT", "/api/notifications/read-all", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("DELETE", &format!("/api/notifications/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_forbidden_for_students() {
    let app = TestApp::new();
    let token = app.token_for(UserRole::Student, "student");

    let body = json!({
        "recipient_id": Uuid::new_v4(),
        "title": "Hello",
        "message": "World",
    });

    let response = app
        .request("POST", "/api/notifications", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body.get("error").unwrap().as_str().unwrap(),
        "FORBIDDEN"
    );
}

#[tokio::test]
async fn test_create_forbidden_for_instructors() {
    let app = TestApp::new();
    let token = app.token_for(UserRole::Instructor, "instructor1");

    let body = json!({
        "recipient_ids": [Uuid::new_v4()],
        "title": "Hello",
        "message": "World",
    });

    let response = app
        .request("POST", "/api/notifications/bulk", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_rejects_oversized_title() {
    let app = TestApp::new();
    let token = app.token_for(UserRole::Admin, "admin");

    let body = json!({
        "recipient_id": Uuid::new_v4(),
        "title": "x".repeat(201),
        "message": "World",
    });

    let response = app
        .request("POST", "/api/notifications", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body.get("error").unwrap().as_str().unwrap(),
        "VALIDATION_ERROR"
    );
}

#[tokio::test]
async fn test_bulk_create_rejects_empty_recipients() {
    let app = TestApp::new();
    let token = app.token_for(UserRole::Admin, "admin");

    let body = json!({
        "recipient_ids": [],
        "title": "Hello",
        "message": "World",
    });

    let response = app
        .request("POST", "/api/notifications/bulk", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
