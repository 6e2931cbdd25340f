/**
 * Conversation Aggregator
 *
 * Turns a user's flat message history into one summary per peer: the
 * most recent message in either direction and the number of messages
 * from that peer the user has not read yet.
 *
 * # Ordering
 *
 * "Most recent" is the maximum by `(created_at, id)`, so two messages
 * created in the same instant still resolve the same way every time.
 * Summaries are sorted by that key, newest first.
 *
 * This is a read-only snapshot. Unlike history, listing conversations
 * never marks anything read.
 */

use std::collections::HashMap;

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::messaging::ConversationSummary;
use crate::shared::Message;

/// Group `messages` by counterpart of `user_id`
///
/// Messages not involving `user_id` are ignored. The returned summaries
/// have no peer profile attached.
pub fn summarize(user_id: Uuid, messages: Vec<Message>) -> Vec<ConversationSummary> {
    let mut groups: HashMap<Uuid, (Message, u64)> = HashMap::new();

    for message in messages.into_iter().filter(|m| m.involves(user_id)) {
        let peer_id = message.counterpart(user_id);
        let unread = u64::from(message.is_unread_by(user_id));

        match groups.get_mut(&peer_id) {
            Some((latest, unread_count)) => {
                *unread_count += unread;
                if message.recency_key() > latest.recency_key() {
                    *latest = message;
                }
            }
            None => {
                groups.insert(peer_id, (message, unread));
            }
        }
    }

    let mut summaries: Vec<ConversationSummary> = groups
        .into_iter()
        .map(|(peer_id, (latest, unread_count))| ConversationSummary {
            peer_id,
            peer: None,
            last_message: latest.rendered(),
            unread_count,
        })
        .collect();
    summaries.sort_by(|a, b| b.last_message.recency_key().cmp(&a.last_message.recency_key()));
    summaries
}

/// Every conversation of `user_id`, most recent first, with peer profiles
pub async fn list_conversations(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<ConversationSummary>, BackendError> {
    let messages = state.archive.messages_involving(user_id).await?;
    let mut summaries = summarize(user_id, messages);

    for summary in &mut summaries {
        summary.peer = state.directory.find_user(summary.peer_id).await?;
        if summary.peer.is_none() {
            tracing::warn!(
                "[Conversations] Peer {} of {} is missing from the directory",
                summary.peer_id,
                user_id
            );
        }
    }

    tracing::debug!(
        "[Conversations] {} conversations for {}",
        summaries.len(),
        user_id
    );
    Ok(summaries)
}
