//! Authentication of the WebSocket endpoint

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{generate_expired_token, TestApp};

#[tokio::test]
async fn test_ws_without_token_is_unauthorized() {
    let app = TestApp::new();
    let server = app.server();

    let response = server.get("/ws").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "missing credential");
    assert!(app.state.presence.is_empty());
}

#[tokio::test]
async fn test_ws_with_invalid_token_is_unauthorized() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let server = app.server();

    let response = server.get("/ws").authorization_bearer("garbage").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid credential");

    let response = server
        .get("/ws")
        .add_query_param("token", generate_expired_token(alice.id))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("expired"));

    assert!(app.state.presence.is_empty());
}

#[tokio::test]
async fn test_ws_with_valid_token_gets_past_authentication() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let server = app.server();

    // A plain GET is not an upgrade, so the request fails after authentication
    let response = server
        .get("/ws")
        .add_query_param("token", app.token_for(&alice))
        .await;
    assert_ne!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(response.status_code().is_client_error());
    assert!(app.state.presence.is_empty());
}
