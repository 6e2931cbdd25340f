//! User Directory
//!
//! The directory owns user identity. This server only reads public
//! profiles from it and records presence (`status`, `last_connection`).
//! Postgres-backed deployments use `PgUserDirectory`; tests and the
//! database-less dev mode use `InMemoryDirectory`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::{PresenceStatus, PublicUser};

/// Read/presence access to the user directory
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Public profile by id, `None` when the user does not exist
    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, BackendError>;

    /// Record a presence change and the time it happened
    async fn set_presence(
        &self,
        id: Uuid,
        status: PresenceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), BackendError>;
}

/// Directory kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<HashMap<Uuid, PublicUser>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an offline user with a fresh id
    pub async fn add_user(&self, username: &str) -> PublicUser {
        let user = PublicUser::new(username);
        self.insert(user.clone()).await;
        user
    }

    pub async fn insert(&self, user: PublicUser) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<PublicUser>, BackendError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn set_presence(
        &self,
        id: Uuid,
        status: PresenceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| BackendError::not_found("user"))?;
        user.status = status;
        user.last_connection = Some(at);
        Ok(())
    }
}
