/**
 * Real-time Event Protocol
 *
 * This module defines the typed events exchanged over a live connection.
 * Every frame is a JSON text message of the form
 * `{"event": "<name>", "data": {...}}`.
 *
 * # Inbound (client -> server)
 *
 * - `send-message` `{recipient_id, content}`
 * - `message-read` `{message_id}`
 * - `typing` `{recipient_id, isTyping}`
 *
 * # Outbound (server -> client)
 *
 * - `new-message` - full message with sender and recipient populated
 * - `message-sent` `{success, message}` - acknowledgment to the sender
 * - `message-read-confirmation` `{message_id, read_by}`
 * - `user-typing` `{userId, username, isTyping}`
 * - `user-status` `{userId, username, status}`
 * - `error` `{message}`
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SharedError;
use super::message::PopulatedMessage;
use super::user::{PresenceStatus, PublicUser};

/// Payload of `send-message`
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a validation error instead of an unreadable frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SendMessagePayload {
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    #[serde(default)]
    pub content: Option<String>,
}

impl SendMessagePayload {
    pub fn new(recipient_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            recipient_id: Some(recipient_id),
            content: Some(content.into()),
        }
    }
}

/// Payload of `message-read`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageReadPayload {
    #[serde(default)]
    pub message_id: Option<Uuid>,
}

/// Payload of inbound `typing`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TypingPayload {
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    #[serde(default, rename = "isTyping")]
    pub is_typing: bool,
}

/// Events a client may send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    SendMessage(SendMessagePayload),
    MessageRead(MessageReadPayload),
    Typing(TypingPayload),
}

impl ClientEvent {
    /// Decode a text frame
    pub fn from_frame(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SendMessage(_) => "send-message",
            ClientEvent::MessageRead(_) => "message-read",
            ClientEvent::Typing(_) => "typing",
        }
    }
}

/// Payload of `message-sent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageSentPayload {
    pub success: bool,
    pub message: PopulatedMessage,
}

/// Payload of `message-read-confirmation`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadConfirmationPayload {
    pub message_id: Uuid,
    pub read_by: Uuid,
}

/// Payload of outbound `user-typing`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTypingPayload {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    #[serde(rename = "isTyping")]
    pub is_typing: bool,
}

/// Payload of `user-status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStatusPayload {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub status: PresenceStatus,
}

/// Payload of `error`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: String,
}

/// Events the server pushes to a connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    NewMessage(PopulatedMessage),
    MessageSent(MessageSentPayload),
    MessageReadConfirmation(ReadConfirmationPayload),
    UserTyping(UserTypingPayload),
    UserStatus(UserStatusPayload),
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Acknowledge a persisted message to its sender
    pub fn sent(message: PopulatedMessage) -> Self {
        Self::MessageSent(MessageSentPayload {
            success: true,
            message,
        })
    }

    pub fn read_confirmation(message_id: Uuid, read_by: Uuid) -> Self {
        Self::MessageReadConfirmation(ReadConfirmationPayload { message_id, read_by })
    }

    pub fn typing(user: &PublicUser, is_typing: bool) -> Self {
        Self::UserTyping(UserTypingPayload {
            user_id: user.id,
            username: user.username.clone(),
            is_typing,
        })
    }

    pub fn status(user: &PublicUser, status: PresenceStatus) -> Self {
        Self::UserStatus(UserStatusPayload {
            user_id: user.id,
            username: user.username.clone(),
            status,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => "new-message",
            ServerEvent::MessageSent(_) => "message-sent",
            ServerEvent::MessageReadConfirmation(_) => "message-read-confirmation",
            ServerEvent::UserTyping(_) => "user-typing",
            ServerEvent::UserStatus(_) => "user-status",
            ServerEvent::Error(_) => "error",
        }
    }

    /// Encode as a text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
