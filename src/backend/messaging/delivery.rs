/**
 * Message Delivery Pipeline
 *
 * Validate, persist, then deliver. The archive write always happens
 * before any live delivery, and nothing is delivered when it fails.
 *
 * # Steps
 *
 * 1. Reject missing fields and out-of-bounds content (the archive is never touched)
 * 2. Resolve the recipient through the user directory
 * 3. Persist the message with status `sent` and read it back
 * 4. Push `new-message` to the recipient if the presence registry can reach
 *    them, with the visible status advanced to `received`
 * 5. Hand the persisted message back so the caller can acknowledge the sender
 *
 * Delivery is fire-and-forget: an unreachable recipient still leaves the
 * send successful.
 */

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::event::SendMessagePayload;
use crate::shared::message::validate_content;
use crate::shared::{Message, MessageStatus, PopulatedMessage, ServerEvent};

/// Outcome of a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The message as persisted, with both participants populated
    pub message: PopulatedMessage,
    /// True when a live `new-message` was handed to the recipient
    pub delivered_live: bool,
}

/// Send a message from `sender_id`
///
/// # Errors
///
/// * `Validation` - missing recipient or content, empty or oversized content
/// * `NotFound` - the recipient is not in the directory
/// * infrastructure errors from the archive or directory
pub async fn send_message(
    state: &AppState,
    sender_id: Uuid,
    payload: SendMessagePayload,
) -> Result<Delivery, BackendError> {
    let recipient_id = payload
        .recipient_id
        .ok_or_else(|| BackendError::validation("recipient_id", "missing fields"))?;
    let content = payload
        .content
        .ok_or_else(|| BackendError::validation("content", "missing fields"))?;
    validate_content(&content)?;

    let recipient = state
        .directory
        .find_user(recipient_id)
        .await?
        .ok_or_else(|| BackendError::not_found("recipient"))?;
    let sender = state
        .directory
        .find_user(sender_id)
        .await?
        .ok_or_else(|| BackendError::not_found("sender"))?;

    let stored = state
        .archive
        .insert(&Message::new(sender.id, recipient.id, content))
        .await
        .map_err(|e| {
            tracing::error!("[Delivery] Failed to persist message from {}: {}", sender.id, e);
            e
        })?;

    let message = PopulatedMessage::new(stored, sender, recipient);
    let live = ServerEvent::NewMessage(message.clone().with_status(MessageStatus::Received));
    let delivered_live = state.presence.send_to(recipient_id, live);

    tracing::info!(
        "[Delivery] Message {} from {} to {} persisted (live: {})",
        message.id,
        message.sender.id,
        recipient_id,
        delivered_live
    );

    Ok(Delivery {
        message,
        delivered_live,
    })
}
