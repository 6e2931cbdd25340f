/**
 * Presence Registry
 *
 * In-memory table of who is reachable right now and how. Each online
 * user maps to exactly one `ConnectionHandle`; a newer connection for the
 * same user replaces the older one for routing (last connect wins). The
 * superseded socket is not closed here.
 *
 * # Ownership
 *
 * Only the gatekeeper writes (`register`, `unregister`). Delivery, read
 * receipts and typing only read (`lookup`). All access goes through a
 * single mutex, so a lookup racing an unregister sees either the old
 * entry or no entry.
 *
 * # Transitions
 *
 * Going online or offline also means an awaited directory write and a
 * broadcast. The gatekeeper runs each of those sequences while holding
 * the user's `PresenceTransition`, so an admission and a release of the
 * same user never interleave and the last broadcast always matches the
 * registry.
 *
 * The table is never persisted. After a restart every user is offline
 * until they reconnect.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Queue feeding one connection's writer task
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// How to reach a connected user
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// Distinguishes connections of the same user
    pub connection_id: Uuid,
    sender: EventSender,
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Create a handle and the receiving end of its queue
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = Self {
            connection_id: Uuid::new_v4(),
            sender,
            connected_at: Utc::now(),
        };
        (handle, receiver)
    }

    /// Queue an event for this connection
    ///
    /// Returns false when the connection's writer has already gone away.
    /// Never waits on the peer.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

type TransitionLocks = Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>;

/// Exclusive right to change one user's presence
///
/// Dropping it lets the next admission or release of that user proceed.
#[derive(Debug)]
pub struct PresenceTransition {
    user_id: Uuid,
    guard: OwnedMutexGuard<()>,
    locks: TransitionLocks,
}

impl Drop for PresenceTransition {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Map entry plus this guard: nobody else is waiting
        if Arc::strong_count(OwnedMutexGuard::mutex(&self.guard)) == 2 {
            locks.remove(&self.user_id);
        }
    }
}

/// Registry of live connections, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    entries: Arc<Mutex<HashMap<Uuid, ConnectionHandle>>>,
    transitions: TransitionLocks,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, ConnectionHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for exclusive control of `user_id`'s presence
    pub async fn transition(&self, user_id: Uuid) -> PresenceTransition {
        let lock = {
            let mut locks = self.transitions.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(user_id).or_default().clone()
        };
        PresenceTransition {
            user_id,
            guard: lock.lock_owned().await,
            locks: self.transitions.clone(),
        }
    }

    /// Make `handle` the route to `user_id`
    ///
    /// Returns the handle it superseded, if any.
    pub fn register(&self, user_id: Uuid, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let previous = self.entries().insert(user_id, handle);
        if let Some(previous) = &previous {
            tracing::info!(
                "[Presence] User {} reconnected, superseding connection {}",
                user_id,
                previous.connection_id
            );
        }
        previous
    }

    /// Remove the route to `user_id` if it still points at `connection_id`
    ///
    /// Returns true when an entry was removed. A superseded connection
    /// closing late leaves the newer entry in place and returns false.
    pub fn unregister(&self, user_id: Uuid, connection_id: Uuid) -> bool {
        let mut entries = self.entries();
        match entries.get(&user_id) {
            Some(current) if current.connection_id == connection_id => {
                entries.remove(&user_id);
                true
            }
            _ => false,
        }
    }

    /// Current route to `user_id`, if they are reachable
    pub fn lookup(&self, user_id: Uuid) -> Option<ConnectionHandle> {
        self.entries().get(&user_id).cloned()
    }

    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.entries().contains_key(&user_id)
    }

    /// Queue an event for `user_id` if reachable
    ///
    /// Returns true when the event was handed to a live connection.
    pub fn send_to(&self, user_id: Uuid, event: ServerEvent) -> bool {
        match self.lookup(user_id) {
            Some(handle) => handle.send(event),
            None => false,
        }
    }

    /// Snapshot of the users currently online
    pub fn online_users(&self) -> Vec<Uuid> {
        self.entries().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
