//! Inbound event dispatch
//!
//! Each frame a client sends becomes one `ClientEvent`, handled by exactly
//! one operation. The return value is what goes back to the originating
//! connection: an acknowledgment, an `error` event, or nothing. Events
//! for anyone else are routed through the presence registry by the
//! operations themselves.

use crate::backend::error::BackendError;
use crate::backend::messaging::{delivery, receipts, typing};
use crate::backend::server::state::AppState;
use crate::shared::event::MessageReadPayload;
use crate::shared::{ClientEvent, PublicUser, ServerEvent};

/// Handle one inbound event from `user`
pub async fn dispatch(state: &AppState, user: &PublicUser, event: ClientEvent) -> Option<ServerEvent> {
    let name = event.name();
    tracing::debug!("[Dispatch] {} from {}", name, user.id);

    let result = match event {
        ClientEvent::SendMessage(payload) => delivery::send_message(state, user.id, payload)
            .await
            .map(|sent| Some(ServerEvent::sent(sent.message))),
        ClientEvent::MessageRead(MessageReadPayload { message_id }) => match message_id {
            Some(message_id) => receipts::mark_read(state, user.id, message_id).await.map(|_| None),
            None => Err(BackendError::validation("message_id", "missing fields")),
        },
        ClientEvent::Typing(payload) => {
            typing::relay_typing(&state.presence, &state.typing, user, payload).map(|_| None)
        }
    };

    match result {
        Ok(reply) => reply,
        Err(error) => {
            if error.is_infrastructure() {
                tracing::error!("[Dispatch] {} from {} failed: {}", name, user.id, error);
            } else {
                tracing::warn!("[Dispatch] {} from {} rejected: {}", name, user.id, error);
            }
            Some(ServerEvent::from(&error))
        }
    }
}
