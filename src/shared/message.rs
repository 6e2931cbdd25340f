/**
 * Message Data Structure
 *
 * This module defines the one-to-one `Message` record, its delivery
 * status, and the content rules every new message must satisfy.
 *
 * A message belongs to exactly one ordered (sender, recipient) pair.
 * Its status only ever moves forward (`sent` -> `received` -> `read`).
 * Edits keep no history, only the `edited` flag. A soft-deleted message
 * keeps its record but every reader sees `DELETED_PLACEHOLDER` instead
 * of its content.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SharedError;
use super::user::PublicUser;

/// Upper bound on message content, counted in characters
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Content shown in place of a soft-deleted message
pub const DELETED_PLACEHOLDER: &str = "[Message deleted]";

/// Delivery status of a message
///
/// Variants are declared in lifecycle order so that `Ord` matches the
/// direction a status is allowed to move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sent,
    Received,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Received => "received",
            MessageStatus::Read => "read",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SharedError> {
        match value {
            "sent" => Ok(MessageStatus::Sent),
            "received" => Ok(MessageStatus::Received),
            "read" => Ok(MessageStatus::Read),
            other => Err(SharedError::unknown("message status", other)),
        }
    }

    /// Position in the lifecycle, used by stores that compare statuses
    pub fn rank(&self) -> i16 {
        match self {
            MessageStatus::Sent => 0,
            MessageStatus::Received => 1,
            MessageStatus::Read => 2,
        }
    }

    /// Move towards `target` without ever going backwards
    ///
    /// ```rust
    /// use parley::shared::message::MessageStatus;
    ///
    /// assert_eq!(MessageStatus::Sent.advance(MessageStatus::Read), MessageStatus::Read);
    /// assert_eq!(MessageStatus::Read.advance(MessageStatus::Received), MessageStatus::Read);
    /// ```
    pub fn advance(self, target: MessageStatus) -> MessageStatus {
        self.max(target)
    }
}

/// A persisted one-to-one message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub status: MessageStatus,
    pub edited: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message in the `sent` state, stamped with the current time
    pub fn new(sender_id: Uuid, recipient_id: Uuid, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            content: content.into(),
            status: MessageStatus::Sent,
            edited: false,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The message as any reader is allowed to see it
    ///
    /// Deleted messages have their content replaced by the placeholder.
    pub fn rendered(mut self) -> Self {
        if self.deleted {
            self.content = DELETED_PLACEHOLDER.to_string();
        }
        self
    }

    /// The other participant from `user_id`'s point of view
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.recipient_id
        } else {
            self.sender_id
        }
    }

    /// True when the message was exchanged between `a` and `b` in either direction
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.recipient_id == b)
            || (self.sender_id == b && self.recipient_id == a)
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// Addressed to `user_id` and not read yet
    pub fn is_unread_by(&self, user_id: Uuid) -> bool {
        self.recipient_id == user_id && self.status != MessageStatus::Read
    }

    /// Recency key: creation time, then id for a deterministic tie-break
    pub fn recency_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }
}

/// A message with both participants expanded to their public identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopulatedMessage {
    pub id: Uuid,
    pub sender: PublicUser,
    pub recipient: PublicUser,
    pub content: String,
    pub status: MessageStatus,
    pub edited: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedMessage {
    pub fn new(message: Message, sender: PublicUser, recipient: PublicUser) -> Self {
        let message = message.rendered();
        Self {
            id: message.id,
            sender,
            recipient,
            content: message.content,
            status: message.status,
            edited: message.edited,
            deleted: message.deleted,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }

    /// Copy with the visible status moved forward
    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = self.status.advance(status);
        self
    }
}

/// Check new message content against the accepted bounds
///
/// Returns the content unchanged when it is acceptable.
///
/// ```rust
/// use parley::shared::message::{validate_content, MAX_CONTENT_CHARS};
///
/// assert!(validate_content("hello").is_ok());
/// assert!(validate_content("").is_err());
/// assert!(validate_content(&"x".repeat(MAX_CONTENT_CHARS + 1)).is_err());
/// ```
pub fn validate_content(content: &str) -> Result<&str, SharedError> {
    if content.is_empty() {
        return Err(SharedError::validation("content", "content cannot be empty"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(SharedError::validation(
            "content",
            format!("content exceeds {} characters", MAX_CONTENT_CHARS),
        ));
    }
    Ok(content)
}
