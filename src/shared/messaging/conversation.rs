//! Conversation Summary
//!
//! A derived, non-persisted view of the exchange between the requesting
//! user and one peer: the latest message and how many messages addressed
//! to the requester are still unread.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::message::Message;
use crate::shared::user::PublicUser;

/// One entry of a user's conversation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationSummary {
    /// The other participant
    pub peer_id: Uuid,
    /// Public identity of the peer, `None` if the directory no longer knows them
    pub peer: Option<PublicUser>,
    /// Most recent message in either direction, already rendered
    pub last_message: Message,
    /// Messages from the peer to the requester not yet read
    pub unread_count: u64,
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}
