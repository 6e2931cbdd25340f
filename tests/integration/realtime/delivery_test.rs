//! Message delivery tests

use assert_matches::assert_matches;
use parley::backend::error::BackendError;
use parley::backend::messaging::{dispatch, send_message};
use parley::shared::event::SendMessagePayload;
use parley::shared::message::MAX_CONTENT_CHARS;
use parley::shared::{ClientEvent, MessageStatus, ServerEvent};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{new_messages, routed, TestApp};

#[tokio::test]
async fn test_connected_recipient_gets_exactly_one_new_message() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut bob_session = app.connect(&bob).await;

    let sent = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, "Hello Bob!"))
        .await
        .unwrap();

    assert!(sent.delivered_live);
    assert_eq!(sent.message.content, "Hello Bob!");
    assert_eq!(sent.message.status, MessageStatus::Sent);
    assert_eq!(app.archive.count_sent_by(alice.id).await, 1);

    let delivered = new_messages(&routed(&mut bob_session));
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, sent.message.id);
    assert_eq!(delivered[0].sender.id, alice.id);
    assert_eq!(delivered[0].sender.username, "alice");
    assert_eq!(delivered[0].recipient.id, bob.id);
    assert_eq!(delivered[0].status, MessageStatus::Received);
}

#[tokio::test]
async fn test_offline_recipient_still_persists() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let sent = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, "later"))
        .await
        .unwrap();

    assert!(!sent.delivered_live);
    assert_eq!(app.archive.count_sent_by(alice.id).await, 1);
    let stored = app.stored_message(sent.message.id).await;
    assert_eq!(stored.status, MessageStatus::Sent);
}

#[tokio::test]
async fn test_invalid_content_never_reaches_archive() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut bob_session = app.connect(&bob).await;

    for content in [String::new(), "x".repeat(MAX_CONTENT_CHARS + 1)] {
        let result = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, content)).await;
        assert_matches!(result, Err(BackendError::Validation { .. }));
    }

    assert!(app.archive.is_empty().await);
    assert!(routed(&mut bob_session).is_empty());
}

#[tokio::test]
async fn test_content_at_limit_is_accepted() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let content = "x".repeat(MAX_CONTENT_CHARS);
    let sent = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, content.clone()))
        .await
        .unwrap();
    assert_eq!(sent.message.content, content);
}

#[tokio::test]
async fn test_missing_fields() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let no_recipient = SendMessagePayload {
        recipient_id: None,
        content: Some("hi".to_string()),
    };
    let error = send_message(&app.state, alice.id, no_recipient).await.unwrap_err();
    assert_eq!(error.client_message(), "missing fields");

    let no_content = SendMessagePayload {
        recipient_id: Some(alice.id),
        content: None,
    };
    let error = send_message(&app.state, alice.id, no_content).await.unwrap_err();
    assert_eq!(error.client_message(), "missing fields");
    assert!(app.archive.is_empty().await);
}

#[tokio::test]
async fn test_unknown_recipient() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let error = send_message(&app.state, alice.id, SendMessagePayload::new(Uuid::new_v4(), "hello?"))
        .await
        .unwrap_err();
    assert_matches!(error, BackendError::NotFound { .. });
    assert_eq!(error.client_message(), "recipient not found");
    assert!(app.archive.is_empty().await);
}

#[tokio::test]
async fn test_persistence_failure_delivers_nothing() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut bob_session = app.connect(&bob).await;
    app.archive.fail_writes(true);

    let error = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, "lost"))
        .await
        .unwrap_err();
    assert!(error.is_infrastructure());
    assert_eq!(error.client_message(), "server error");
    assert!(routed(&mut bob_session).is_empty());
}

#[tokio::test]
async fn test_dispatch_acknowledges_sender() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let reply = dispatch(
        &app.state,
        &alice,
        ClientEvent::SendMessage(SendMessagePayload::new(bob.id, "ack me")),
    )
    .await;

    match reply {
        Some(ServerEvent::MessageSent(ack)) => {
            assert!(ack.success);
            assert_eq!(ack.message.content, "ack me");
            assert_eq!(ack.message.recipient.id, bob.id);
        }
        other => panic!("expected message-sent, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dispatch_reports_validation_error_to_sender_only() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut bob_session = app.connect(&bob).await;

    let reply = dispatch(
        &app.state,
        &alice,
        ClientEvent::SendMessage(SendMessagePayload::new(bob.id, "")),
    )
    .await;

    assert_eq!(reply, Some(ServerEvent::error("content cannot be empty")));
    assert!(routed(&mut bob_session).is_empty());
}

#[tokio::test]
async fn test_message_to_self() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let mut session = app.connect(&alice).await;

    let sent = send_message(&app.state, alice.id, SendMessagePayload::new(alice.id, "note"))
        .await
        .unwrap();
    assert!(sent.delivered_live);
    assert_eq!(new_messages(&routed(&mut session)).len(), 1);
}
