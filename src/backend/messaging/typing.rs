//! Typing Notifier
//!
//! Relays typing start/stop between two users. Nothing is persisted and
//! an unreachable recipient simply never hears about it.
//!
//! The notifier remembers which peers were last told a user is typing,
//! so the gatekeeper can send them an explicit stop when that user's
//! connection goes away.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::realtime::PresenceRegistry;
use crate::shared::event::TypingPayload;
use crate::shared::{PublicUser, ServerEvent};

/// Peers each user is currently shown as typing to
#[derive(Debug, Clone, Default)]
pub struct TypingState {
    active: Arc<Mutex<HashMap<Uuid, HashSet<Uuid>>>>,
}

impl TypingState {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, HashMap<Uuid, HashSet<Uuid>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the latest typing signal from `typer` to `peer`
    pub fn record(&self, typer: Uuid, peer: Uuid, is_typing: bool) {
        let mut active = self.active();
        if is_typing {
            active.entry(typer).or_default().insert(peer);
        } else if let Some(peers) = active.get_mut(&typer) {
            peers.remove(&peer);
            if peers.is_empty() {
                active.remove(&typer);
            }
        }
    }

    pub fn is_typing_to(&self, typer: Uuid, peer: Uuid) -> bool {
        self.active()
            .get(&typer)
            .is_some_and(|peers| peers.contains(&peer))
    }

    /// Forget and return every peer `typer` was shown as typing to
    pub fn take_active(&self, typer: Uuid) -> Vec<Uuid> {
        self.active()
            .remove(&typer)
            .map(|peers| peers.into_iter().collect())
            .unwrap_or_default()
    }
}

/// Relay a typing signal from `typer`
///
/// Returns whether the recipient was reachable. Only a missing
/// `recipient_id` is an error. A start signal that reached nobody is not
/// remembered.
pub fn relay_typing(
    presence: &PresenceRegistry,
    typing: &TypingState,
    typer: &PublicUser,
    payload: TypingPayload,
) -> Result<bool, BackendError> {
    let recipient_id = payload
        .recipient_id
        .ok_or_else(|| BackendError::validation("recipient_id", "missing fields"))?;

    let relayed = presence.send_to(recipient_id, ServerEvent::typing(typer, payload.is_typing));
    // Only peers that were actually told need a stop on disconnect
    if relayed || !payload.is_typing {
        typing.record(typer.id, recipient_id, payload.is_typing);
    }

    tracing::debug!(
        "[Typing] {} -> {} isTyping={} relayed={}",
        typer.id,
        recipient_id,
        payload.is_typing,
        relayed
    );
    Ok(relayed)
}
