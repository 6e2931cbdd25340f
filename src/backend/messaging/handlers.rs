//! Messaging HTTP Handlers
//!
//! The read side of messaging (conversation list, history) plus REST
//! variants of sending and reading messages. The write handlers run the
//! same operations as the socket events, so a message sent over HTTP is
//! still delivered live to a connected recipient.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{conversations, delivery, history, receipts};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::PresenceRegistry;
use crate::backend::server::state::AppState;
use crate::shared::event::SendMessagePayload;
use crate::shared::messaging::{HistoryPage, HistoryParams, ListConversationsResponse};
use crate::shared::{Message, PopulatedMessage};

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub online_users: usize,
}

/// List the caller's conversations (GET /api/messages/conversations)
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ListConversationsResponse>, BackendError> {
    let conversations = conversations::list_conversations(&state, user.id).await?;
    Ok(Json(ListConversationsResponse { conversations }))
}

/// History with one peer (GET /api/messages/{id}?page=&limit=)
///
/// Marks the peer's unread messages to the caller as read.
pub async fn get_messages_with(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryPage>, BackendError> {
    let page = history::conversation_history(&state, user.id, peer_id, params).await?;
    Ok(Json(page))
}

/// Send a message (POST /api/messages)
pub async fn create_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SendMessagePayload>,
) -> Result<(StatusCode, Json<PopulatedMessage>), BackendError> {
    let sent = delivery::send_message(&state, user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(sent.message)))
}

/// Mark a message as read (POST /api/messages/{id}/read)
pub async fn mark_as_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<Json<Message>, BackendError> {
    let receipt = receipts::mark_read(&state, user.id, message_id).await?;
    Ok(Json(receipt.message))
}

/// Liveness check (GET /api/health)
pub async fn health(State(presence): State<PresenceRegistry>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        online_users: presence.online_users().len(),
    })
}
