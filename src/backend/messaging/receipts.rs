/**
 * Read-Receipt Tracker
 *
 * Only a message's recipient may mark it read. Marking an already-read
 * message again succeeds without notifying anyone; otherwise the sender
 * receives `message-read-confirmation` if they are reachable.
 *
 * Whether this call is the one that moved the message to `read` is
 * decided by the archive's atomic `set_status`, not by the earlier
 * lookup, so concurrent reads over REST and the socket confirm once.
 */

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::{Message, MessageStatus, ServerEvent};

/// Result of a successful `mark_read`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReceipt {
    /// The message after the update
    pub message: Message,
    /// False when the message was already read
    pub changed: bool,
    /// True when the sender was sent a confirmation
    pub sender_notified: bool,
}

/// Mark `message_id` as read on behalf of `reader_id`
///
/// # Errors
///
/// * `NotFound` - no such message
/// * `Forbidden` - `reader_id` is not the recipient
pub async fn mark_read(
    state: &AppState,
    reader_id: Uuid,
    message_id: Uuid,
) -> Result<ReadReceipt, BackendError> {
    let message = state
        .archive
        .find(message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("message"))?;

    if message.recipient_id != reader_id {
        tracing::warn!(
            "[Receipts] User {} tried to mark message {} they did not receive",
            reader_id,
            message_id
        );
        return Err(BackendError::forbidden(
            "only the recipient can mark a message as read",
        ));
    }

    let update = state
        .archive
        .set_status(message_id, MessageStatus::Read)
        .await?
        .ok_or_else(|| BackendError::not_found("message"))?;

    if !update.changed {
        tracing::debug!("[Receipts] Message {} already read", message_id);
        return Ok(ReadReceipt {
            message: update.message.rendered(),
            changed: false,
            sender_notified: false,
        });
    }

    let sender_notified = state.presence.send_to(
        update.message.sender_id,
        ServerEvent::read_confirmation(message_id, reader_id),
    );
    tracing::info!(
        "[Receipts] Message {} read by {} (sender notified: {})",
        message_id,
        reader_id,
        sender_notified
    );

    Ok(ReadReceipt {
        message: update.message.rendered(),
        changed: true,
        sender_notified,
    })
}
