//! Typing notifier tests

use parley::backend::messaging::dispatch;
use parley::backend::realtime::release;
use parley::shared::event::TypingPayload;
use parley::shared::{ClientEvent, PresenceStatus, ServerEvent};
use uuid::Uuid;

use crate::common::{routed, statuses, TestApp};

fn typing(recipient_id: Option<Uuid>, is_typing: bool) -> ClientEvent {
    ClientEvent::Typing(TypingPayload {
        recipient_id,
        is_typing,
    })
}

#[tokio::test]
async fn test_typing_is_relayed_to_peer() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_session = app.connect(&alice).await;
    let mut bob_session = app.connect(&bob).await;

    let reply = dispatch(&app.state, &alice_session.user, typing(Some(bob.id), true)).await;
    assert!(reply.is_none());

    let events = routed(&mut bob_session);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::UserTyping(payload) => {
            assert_eq!(payload.user_id, alice.id);
            assert_eq!(payload.username, "alice");
            assert!(payload.is_typing);
        }
        other => panic!("unexpected event {:?}", other),
    }

    dispatch(&app.state, &alice_session.user, typing(Some(bob.id), false)).await;
    assert_eq!(
        routed(&mut bob_session),
        vec![ServerEvent::typing(&alice_session.user, false)]
    );
}

#[tokio::test]
async fn test_typing_to_offline_peer_is_dropped() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut alice_session = app.connect(&alice).await;

    let reply = dispatch(&app.state, &alice_session.user, typing(Some(bob.id), true)).await;
    assert!(reply.is_none());
    assert!(routed(&mut alice_session).is_empty());
}

#[tokio::test]
async fn test_typing_without_recipient_is_an_error() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let alice_session = app.connect(&alice).await;

    let reply = dispatch(&app.state, &alice_session.user, typing(None, true)).await;
    assert_eq!(reply, Some(ServerEvent::error("missing fields")));
}

#[tokio::test]
async fn test_disconnect_while_typing_sends_stop() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_session = app.connect(&alice).await;
    let mut bob_session = app.connect(&bob).await;
    statuses(&mut bob_session);

    dispatch(&app.state, &alice_session.user, typing(Some(bob.id), true)).await;
    routed(&mut bob_session);

    release(&app.state, &alice_session.user, alice_session.connection_id).await;

    assert_eq!(
        routed(&mut bob_session),
        vec![ServerEvent::typing(&alice_session.user, false)]
    );
    let seen = statuses(&mut bob_session);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, alice.id);
    assert_eq!(seen[0].status, PresenceStatus::Offline);
}

#[tokio::test]
async fn test_disconnect_after_stop_sends_nothing_extra() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_session = app.connect(&alice).await;
    let mut bob_session = app.connect(&bob).await;

    dispatch(&app.state, &alice_session.user, typing(Some(bob.id), true)).await;
    dispatch(&app.state, &alice_session.user, typing(Some(bob.id), false)).await;
    routed(&mut bob_session);

    release(&app.state, &alice_session.user, alice_session.connection_id).await;
    assert!(routed(&mut bob_session).is_empty());
}
