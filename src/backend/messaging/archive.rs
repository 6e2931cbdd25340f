//! Message Archive
//!
//! The archive is the system of record for messages. The realtime core
//! only talks to it through `MessageArchive`; `PgMessageArchive` (see
//! `db`) is the production store and `InMemoryArchive` backs tests and
//! database-less runs.
//!
//! Every write returns the record as persisted, so callers can
//! acknowledge exactly what was stored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::{Message, MessageStatus};

/// Outcome of `MessageArchive::set_status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// The stored record after the update
    pub message: Message,
    /// False when the message already had the target status or a later one
    pub changed: bool,
}

/// Durable message store
#[async_trait]
pub trait MessageArchive: Send + Sync {
    /// Persist a new message and read it back
    async fn insert(&self, message: &Message) -> Result<Message, BackendError>;

    /// Point lookup
    async fn find(&self, id: Uuid) -> Result<Option<Message>, BackendError>;

    /// Advance a message's status, never moving it backwards
    ///
    /// The comparison and the write are one atomic step, so of several
    /// concurrent callers at most one sees `changed`. Returns `None` when
    /// no such message exists.
    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<Option<StatusUpdate>, BackendError>;

    /// One page of the messages exchanged between `a` and `b`, newest first
    async fn conversation(
        &self,
        a: Uuid,
        b: Uuid,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Message>, BackendError>;

    /// Number of messages exchanged between `a` and `b`
    async fn count_conversation(&self, a: Uuid, b: Uuid) -> Result<u64, BackendError>;

    /// Mark every unread message from `counterpart` to `reader` as read
    ///
    /// Returns how many messages changed.
    async fn mark_conversation_read(
        &self,
        reader: Uuid,
        counterpart: Uuid,
    ) -> Result<u64, BackendError>;

    /// Every message the user sent or received
    async fn messages_involving(&self, user: Uuid) -> Result<Vec<Message>, BackendError>;
}

/// Archive kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail as if the store were unreachable
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), BackendError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::storage("archive unavailable"));
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Number of messages sent by `user`
    pub async fn count_sent_by(&self, user: Uuid) -> usize {
        self.messages
            .read()
            .await
            .values()
            .filter(|message| message.sender_id == user)
            .count()
    }

    /// Replace a message's content and flag it as edited
    pub async fn edit(&self, id: Uuid, content: &str) -> Result<Option<Message>, BackendError> {
        self.check_writable()?;
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(&id).map(|message| {
            message.content = content.to_string();
            message.edited = true;
            message.updated_at = Utc::now();
            message.clone()
        }))
    }

    /// Flag a message as deleted, keeping the record
    pub async fn soft_delete(&self, id: Uuid) -> Result<Option<Message>, BackendError> {
        self.check_writable()?;
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(&id).map(|message| {
            message.deleted = true;
            message.updated_at = Utc::now();
            message.clone()
        }))
    }
}

#[async_trait]
impl MessageArchive for InMemoryArchive {
    async fn insert(&self, message: &Message) -> Result<Message, BackendError> {
        self.check_writable()?;
        let mut messages = self.messages.write().await;
        messages.insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Message>, BackendError> {
        Ok(self.messages.read().await.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<Option<StatusUpdate>, BackendError> {
        self.check_writable()?;
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(&id).map(|message| {
            let changed = message.status < status;
            message.status = message.status.advance(status);
            StatusUpdate {
                message: message.clone(),
                changed,
            }
        }))
    }

    async fn conversation(
        &self,
        a: Uuid,
        b: Uuid,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Message>, BackendError> {
        let messages = self.messages.read().await;
        let mut page: Vec<Message> = messages
            .values()
            .filter(|message| message.is_between(a, b))
            .cloned()
            .collect();
        page.sort_by(|x, y| y.recency_key().cmp(&x.recency_key()));

        Ok(page
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_conversation(&self, a: Uuid, b: Uuid) -> Result<u64, BackendError> {
        let messages = self.messages.read().await;
        Ok(messages.values().filter(|m| m.is_between(a, b)).count() as u64)
    }

    async fn mark_conversation_read(
        &self,
        reader: Uuid,
        counterpart: Uuid,
    ) -> Result<u64, BackendError> {
        self.check_writable()?;
        let mut messages = self.messages.write().await;
        let mut changed = 0;
        for message in messages.values_mut() {
            if message.sender_id == counterpart && message.is_unread_by(reader) {
                message.status = MessageStatus::Read;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn messages_involving(&self, user: Uuid) -> Result<Vec<Message>, BackendError> {
        let messages = self.messages.read().await;
        Ok(messages
            .values()
            .filter(|message| message.involves(user))
            .cloned()
            .collect())
    }
}
