//! Live WebSocket sessions against a running server

use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::TestApp;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

async fn open_socket(server: &TestServer, token: String) -> TestWebSocket {
    server
        .get_websocket("/ws")
        .add_query_param("token", token)
        .await
        .into_websocket()
        .await
}

/// Read frames until one named `event` arrives, returning its data
async fn next_event(socket: &mut TestWebSocket, event: &str) -> Value {
    tokio::time::timeout(FRAME_TIMEOUT, async {
        loop {
            let frame: Value = socket.receive_json().await;
            if frame["event"] == event {
                return frame["data"].clone();
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no {event} frame"))
}

/// Read frames until `user_id` is announced with `status`
async fn wait_for_status(socket: &mut TestWebSocket, user_id: Uuid, status: &str) {
    loop {
        let data = next_event(socket, "user-status").await;
        if data["userId"] == user_id.to_string() && data["status"] == status {
            return;
        }
    }
}

#[tokio::test]
async fn test_message_reaches_live_peer() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let server = app.socket_server();

    let mut alice_socket = open_socket(&server, app.token_for(&alice)).await;
    wait_for_status(&mut alice_socket, alice.id, "online").await;
    let mut bob_socket = open_socket(&server, app.token_for(&bob)).await;
    wait_for_status(&mut bob_socket, bob.id, "online").await;
    wait_for_status(&mut alice_socket, bob.id, "online").await;

    alice_socket
        .send_text(json!({"event": "send-message", "data": {"recipient_id": bob.id, "content": "hi bob"}}).to_string())
        .await;

    let ack = next_event(&mut alice_socket, "message-sent").await;
    assert_eq!(ack["success"], true);
    assert_eq!(ack["message"]["content"], "hi bob");
    assert_eq!(ack["message"]["status"], "sent");

    let delivered = next_event(&mut bob_socket, "new-message").await;
    assert_eq!(delivered["id"], ack["message"]["id"]);
    assert_eq!(delivered["sender"]["username"], "alice");
    assert_eq!(delivered["content"], "hi bob");
    assert_eq!(delivered["status"], "received");
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let server = app.socket_server();

    let mut alice_socket = open_socket(&server, app.token_for(&alice)).await;
    wait_for_status(&mut alice_socket, alice.id, "online").await;
    let mut bob_socket = open_socket(&server, app.token_for(&bob)).await;
    wait_for_status(&mut bob_socket, bob.id, "online").await;

    alice_socket.send_text("not json").await;
    let error = next_event(&mut alice_socket, "error").await;
    assert_eq!(error, json!({"message": "malformed event"}));

    alice_socket
        .send_text(json!({"event": "send-message", "data": {"recipient_id": bob.id, "content": "still here"}}).to_string())
        .await;
    let delivered = next_event(&mut bob_socket, "new-message").await;
    assert_eq!(delivered["content"], "still here");
    assert!(app.state.presence.is_online(alice.id));
}

#[tokio::test]
async fn test_closing_socket_announces_offline() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let server = app.socket_server();

    let mut alice_socket = open_socket(&server, app.token_for(&alice)).await;
    wait_for_status(&mut alice_socket, alice.id, "online").await;
    let mut bob_socket = open_socket(&server, app.token_for(&bob)).await;
    wait_for_status(&mut bob_socket, bob.id, "online").await;
    wait_for_status(&mut alice_socket, bob.id, "online").await;

    bob_socket.close().await;
    wait_for_status(&mut alice_socket, bob.id, "offline").await;

    assert!(!app.state.presence.is_online(bob.id));
    assert!(app.state.presence.is_online(alice.id));
}
