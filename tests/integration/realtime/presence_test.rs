//! Presence and connection lifecycle tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley::backend::auth::directory::{InMemoryDirectory, UserDirectory};
use parley::backend::error::BackendError;
use parley::backend::messaging::archive::InMemoryArchive;
use parley::backend::messaging::send_message;
use parley::backend::realtime::{admit, connect, release};
use parley::backend::server::AppState;
use parley::shared::event::SendMessagePayload;
use parley::shared::{AppConfig, PresenceStatus, PublicUser, ServerEvent};
use uuid::Uuid;

use crate::common::{new_messages, routed, statuses, TestApp, TEST_SECRET};

/// Directory whose offline writes take a while, like a slow database
#[derive(Clone)]
struct SlowOfflineDirectory {
    inner: InMemoryDirectory,
    delay: Duration,
}

#[async_trait]
impl UserDirectory for SlowOfflineDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, BackendError> {
        self.inner.find_user(id).await
    }

    async fn set_presence(
        &self,
        id: Uuid,
        status: PresenceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        if status == PresenceStatus::Offline {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.set_presence(id, status, at).await
    }
}

#[tokio::test]
async fn test_presence_round_trip() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut alice_session = app.connect(&alice).await;
    statuses(&mut alice_session);

    let bob_session = app.connect(&bob).await;
    let seen = statuses(&mut alice_session);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, bob.id);
    assert_eq!(seen[0].username, "bob");
    assert_eq!(seen[0].status, PresenceStatus::Online);

    let stored = app.directory_user(bob.id).await;
    assert_eq!(stored.status, PresenceStatus::Online);
    assert!(stored.last_connection.is_some());

    assert!(release(&app.state, &bob_session.user, bob_session.connection_id).await);
    let seen = statuses(&mut alice_session);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, bob.id);
    assert_eq!(seen[0].status, PresenceStatus::Offline);

    assert!(!app.state.presence.is_online(bob.id));
    assert_eq!(app.directory_user(bob.id).await.status, PresenceStatus::Offline);
}

#[tokio::test]
async fn test_connecting_user_sees_own_online_status() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let mut session = app.connect(&alice).await;
    let seen = statuses(&mut session);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, alice.id);
    assert_eq!(seen[0].status, PresenceStatus::Online);
}

#[tokio::test]
async fn test_failed_authentication_creates_no_state() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let mut alice_session = app.connect(&alice).await;
    statuses(&mut alice_session);

    assert!(connect(&app.state, None).await.is_err());
    assert!(connect(&app.state, Some("not-a-token")).await.is_err());

    assert_eq!(app.state.presence.len(), 1);
    assert!(statuses(&mut alice_session).is_empty());
}

#[tokio::test]
async fn test_connect_with_valid_token() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let token = app.token_for(&alice);

    let session = connect(&app.state, Some(&token)).await.unwrap();
    assert_eq!(session.user.id, alice.id);
    assert!(session.user.is_online());
    assert!(app.state.presence.is_online(alice.id));
}

#[tokio::test]
async fn test_last_connect_wins() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut watcher = app.connect(&alice).await;

    let mut first = app.connect(&bob).await;
    let mut second = app.connect(&bob).await;
    statuses(&mut watcher);

    send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, "which one?"))
        .await
        .unwrap();
    assert!(new_messages(&routed(&mut first)).is_empty());
    assert_eq!(new_messages(&routed(&mut second)).len(), 1);

    // The superseded socket closing does not take bob offline
    assert!(!release(&app.state, &first.user, first.connection_id).await);
    assert!(app.state.presence.is_online(bob.id));
    assert!(statuses(&mut watcher).is_empty());

    assert!(release(&app.state, &second.user, second.connection_id).await);
    let seen = statuses(&mut watcher);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].status, PresenceStatus::Offline);
}

#[tokio::test]
async fn test_registry_is_empty_after_everyone_leaves() {
    let app = TestApp::new();
    let mut sessions = Vec::new();
    for name in ["a", "b", "c"] {
        let user = app.user(name).await;
        sessions.push(app.connect(&user).await);
    }
    assert_eq!(app.state.presence.len(), 3);

    for session in &sessions {
        release(&app.state, &session.user, session.connection_id).await;
    }
    assert!(app.state.presence.is_empty());
}

#[tokio::test]
async fn test_reconnect_during_release_ends_online() {
    let directory = InMemoryDirectory::new();
    let alice = directory.add_user("alice").await;
    let bob = directory.add_user("bob").await;
    let config = AppConfig::builder().jwt_secret(TEST_SECRET).build().unwrap();
    let slow = SlowOfflineDirectory {
        inner: directory.clone(),
        delay: Duration::from_millis(50),
    };
    let state = AppState::new(config, Arc::new(slow), Arc::new(InMemoryArchive::new()));

    let mut watcher = admit(&state, alice.clone()).await;
    let old = admit(&state, bob.clone()).await;
    statuses(&mut watcher);

    let releasing = {
        let state = state.clone();
        let (user, connection_id) = (old.user.clone(), old.connection_id);
        tokio::spawn(async move { release(&state, &user, connection_id).await })
    };
    // Reconnect while the offline write is still in flight
    tokio::time::sleep(Duration::from_millis(10)).await;
    let mut new = admit(&state, bob.clone()).await;
    assert!(releasing.await.unwrap());

    assert!(state.presence.is_online(bob.id));
    let stored = directory.find_user(bob.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PresenceStatus::Online);

    let seen: Vec<PresenceStatus> = statuses(&mut watcher)
        .into_iter()
        .filter(|payload| payload.user_id == bob.id)
        .map(|payload| payload.status)
        .collect();
    assert_eq!(seen.last(), Some(&PresenceStatus::Online));

    assert!(state.presence.send_to(bob.id, ServerEvent::typing(&alice, true)));
    assert_eq!(routed(&mut new), vec![ServerEvent::typing(&alice, true)]);
}
