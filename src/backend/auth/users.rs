/**
 * Postgres User Directory
 *
 * Reads public profiles from the `users` table and writes presence back
 * to it. Account creation and credentials are handled by the login
 * service, which shares this table.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::backend::auth::directory::UserDirectory;
use crate::backend::error::BackendError;
use crate::shared::{PresenceStatus, PublicUser};

/// `UserDirectory` over a Postgres pool
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<PublicUser, BackendError> {
    let status: String = row.try_get("status")?;
    Ok(PublicUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        avatar: row.try_get("avatar")?,
        status: PresenceStatus::parse(&status)?,
        last_connection: row.try_get("last_connection")?,
    })
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, BackendError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, avatar, status, last_connection
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn set_presence(
        &self,
        id: Uuid,
        status: PresenceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = $1, last_connection = $2
            WHERE id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BackendError::not_found("user"));
        }
        Ok(())
    }
}
