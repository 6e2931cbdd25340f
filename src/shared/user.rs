//! Public user identity
//!
//! The part of a user record that other users may see. Credentials and
//! password hashes never appear here; they belong to the external
//! directory service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SharedError;

/// Whether a user currently holds a live connection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Offline => "offline",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SharedError> {
        match value {
            "online" => Ok(PresenceStatus::Online),
            "offline" => Ok(PresenceStatus::Offline),
            other => Err(SharedError::unknown("presence status", other)),
        }
    }
}

/// A user as seen by other users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    /// Display name, unique across the directory
    pub username: String,
    pub avatar: Option<String>,
    pub status: PresenceStatus,
    /// Last connect or disconnect
    pub last_connection: Option<DateTime<Utc>>,
}

impl PublicUser {
    /// A freshly registered, offline user
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            avatar: None,
            status: PresenceStatus::Offline,
            last_connection: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == PresenceStatus::Online
    }
}
