//! Helpers for inspecting what a connection received
//!
//! Routed events are queued synchronously, so once an operation has
//! returned everything it produced is already waiting here.

use parley::backend::realtime::Session;
use parley::shared::event::UserStatusPayload;
use parley::shared::{PopulatedMessage, ServerEvent};

/// Every routed event queued for the session
pub fn routed(session: &mut Session) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = session.events.try_recv() {
        events.push(event);
    }
    events
}

/// Every presence broadcast queued for the session
pub fn broadcasts(session: &mut Session) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = session.broadcasts.try_recv() {
        events.push(event);
    }
    events
}

/// Presence payloads among the queued broadcasts
pub fn statuses(session: &mut Session) -> Vec<UserStatusPayload> {
    broadcasts(session)
        .into_iter()
        .filter_map(|event| match event {
            ServerEvent::UserStatus(payload) => Some(payload),
            _ => None,
        })
        .collect()
}

/// `new-message` payloads among the routed events
pub fn new_messages(events: &[ServerEvent]) -> Vec<PopulatedMessage> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::NewMessage(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}
