//! Database operations for messaging
//!
//! `PgMessageArchive` stores messages in the `messages` table. Statuses are
//! stored as text; forward-only updates compare their lifecycle rank in SQL
//! so that concurrent writers can never move a message backwards.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::archive::{MessageArchive, StatusUpdate};
use crate::backend::error::BackendError;
use crate::shared::{Message, MessageStatus};

const MESSAGE_COLUMNS: &str =
    "id, sender_id, recipient_id, content, status, edited, deleted, created_at, updated_at";

const STATUS_RANK: &str =
    "CASE status WHEN 'sent' THEN 0 WHEN 'received' THEN 1 WHEN 'read' THEN 2 ELSE 0 END";

/// `MessageArchive` over a Postgres pool
#[derive(Debug, Clone)]
pub struct PgMessageArchive {
    pool: PgPool,
}

impl PgMessageArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &PgRow) -> Result<Message, BackendError> {
    let status: String = row.try_get("status")?;
    Ok(Message {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        content: row.try_get("content")?,
        status: MessageStatus::parse(&status)?,
        edited: row.try_get("edited")?,
        deleted: row.try_get("deleted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn messages_from_rows(rows: Vec<PgRow>) -> Result<Vec<Message>, BackendError> {
    rows.iter().map(message_from_row).collect()
}

#[async_trait]
impl MessageArchive for PgMessageArchive {
    async fn insert(&self, message: &Message) -> Result<Message, BackendError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, content, status, edited, deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(message.id)
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(&message.content)
        .bind(message.status.as_str())
        .bind(message.edited)
        .bind(message.deleted)
        .bind(message.created_at)
        .bind(message.updated_at)
        .fetch_one(&self.pool)
        .await?;

        message_from_row(&row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Message>, BackendError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM messages WHERE id = $1",
            MESSAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(message_from_row).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<Option<StatusUpdate>, BackendError> {
        // A message already at or past `status` matches no row
        let row = sqlx::query(&format!(
            r#"
            UPDATE messages
            SET status = $3
            WHERE id = $1 AND {rank} < $2
            RETURNING {columns}
            "#,
            rank = STATUS_RANK,
            columns = MESSAGE_COLUMNS
        ))
        .bind(id)
        .bind(i32::from(status.rank()))
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(Some(StatusUpdate {
                message: message_from_row(&row)?,
                changed: true,
            }));
        }

        Ok(self.find(id).await?.map(|message| StatusUpdate {
            message,
            changed: false,
        }))
    }

    async fn conversation(
        &self,
        a: Uuid,
        b: Uuid,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Message>, BackendError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(a)
        .bind(b)
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        messages_from_rows(rows)
    }

    async fn count_conversation(&self, a: Uuid, b: Uuid) -> Result<u64, BackendError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    async fn mark_conversation_read(
        &self,
        reader: Uuid,
        counterpart: Uuid,
    ) -> Result<u64, BackendError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'read'
            WHERE recipient_id = $1 AND sender_id = $2 AND status <> 'read'
            "#,
        )
        .bind(reader)
        .bind(counterpart)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn messages_involving(&self, user: Uuid) -> Result<Vec<Message>, BackendError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM messages
            WHERE sender_id = $1 OR recipient_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        messages_from_rows(rows)
    }
}
