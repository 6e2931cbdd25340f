//! Conversation history
//!
//! Pages through the messages exchanged with one peer. Reading history
//! is also how a user catches up: every unread message the peer sent to
//! the reader is marked read in bulk, without per-message confirmations.
//! The returned page shows statuses as they were before that update.

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{HistoryPage, HistoryParams, Pagination};

/// One page of history between `user_id` and `peer_id`
///
/// Page 1 holds the most recent messages; the messages inside a page are
/// oldest first. `limit` defaults to the configured page size and is
/// clamped to `1..=max_history_page_limit`.
pub async fn conversation_history(
    state: &AppState,
    user_id: Uuid,
    peer_id: Uuid,
    params: HistoryParams,
) -> Result<HistoryPage, BackendError> {
    if state.directory.find_user(peer_id).await?.is_none() {
        return Err(BackendError::not_found("user"));
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(state.config.history_page_limit)
        .clamp(1, state.config.max_history_page_limit);

    let total = state.archive.count_conversation(user_id, peer_id).await?;
    let pagination = Pagination::new(page, limit, total);

    let mut messages = state
        .archive
        .conversation(user_id, peer_id, limit, pagination.offset())
        .await?;
    messages.reverse();
    let messages = messages.into_iter().map(|m| m.rendered()).collect();

    let marked = state.archive.mark_conversation_read(user_id, peer_id).await?;
    if marked > 0 {
        tracing::debug!(
            "[Receipts] Bulk-marked {} messages from {} to {} as read",
            marked,
            peer_id,
            user_id
        );
    }

    Ok(HistoryPage {
        messages,
        pagination,
    })
}
