/**
 * Connection Gatekeeper
 *
 * Owns the lifecycle of a live connection: authentication before any
 * state exists, registration and the `online` broadcast on admission,
 * and cleanup plus the `offline` broadcast on release.
 *
 * # Admission
 *
 * 1. Subscribe to the presence broadcast (so the user sees their own `online`)
 * 2. Register the connection handle, superseding any older one
 * 3. Record `online` and the connection time in the user directory
 * 4. Broadcast `user-status: online`
 *
 * # Release
 *
 * Only the user's current connection can take them offline. Releasing a
 * superseded connection does nothing. Otherwise peers that were last told
 * the user is typing get an explicit stop, the directory records
 * `offline`, and `user-status: offline` is broadcast.
 *
 * Directory writes are best effort: a failure is logged and the
 * connection carries on.
 *
 * Both sequences run under the user's presence transition, so a
 * reconnect that lands while an older connection is still being released
 * waits for that release and then announces the user online again.
 */

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::backend::auth::sessions::authenticate;
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::realtime::presence::ConnectionHandle;
use crate::backend::server::state::AppState;
use crate::shared::{PresenceStatus, PublicUser, ServerEvent};

/// An admitted connection
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub connection_id: Uuid,
    /// Handle for replies to this connection
    pub handle: ConnectionHandle,
    /// Events routed to this connection
    pub events: mpsc::UnboundedReceiver<ServerEvent>,
    /// Global presence feed
    pub broadcasts: broadcast::Receiver<ServerEvent>,
}

/// Check a connection's credential
///
/// Touches neither the registry nor the directory's presence fields.
pub async fn authenticate_connection(
    state: &AppState,
    token: Option<&str>,
) -> Result<PublicUser, BackendError> {
    match authenticate(state.directory.as_ref(), &state.config.jwt_secret, token).await {
        Ok(user) => Ok(user),
        Err(e) => {
            tracing::warn!("[Gatekeeper] Connection rejected: {}", e);
            Err(e)
        }
    }
}

/// Authenticate and admit in one step
pub async fn connect(state: &AppState, token: Option<&str>) -> Result<Session, BackendError> {
    let user = authenticate_connection(state, token).await?;
    Ok(admit(state, user).await)
}

/// Register an authenticated user's connection and announce them online
pub async fn admit(state: &AppState, mut user: PublicUser) -> Session {
    let broadcasts = state.realtime_broadcast.subscribe();
    let (handle, events) = ConnectionHandle::channel();
    let connection_id = handle.connection_id;
    let now = handle.connected_at;

    let _transition = state.presence.transition(user.id).await;
    state.presence.register(user.id, handle.clone());
    if let Err(e) = state
        .directory
        .set_presence(user.id, PresenceStatus::Online, now)
        .await
    {
        tracing::error!("[Gatekeeper] Failed to record {} online: {}", user.id, e);
    }
    user.status = PresenceStatus::Online;
    user.last_connection = Some(now);

    broadcast_event(
        &state.realtime_broadcast,
        ServerEvent::status(&user, PresenceStatus::Online),
    );
    tracing::info!(
        "[Gatekeeper] {} ({}) connected as {}",
        user.username,
        user.id,
        connection_id
    );

    Session {
        user,
        connection_id,
        handle,
        events,
        broadcasts,
    }
}

/// Tear down a connection
///
/// Returns true when the user went offline, false when the connection
/// had already been superseded.
pub async fn release(state: &AppState, user: &PublicUser, connection_id: Uuid) -> bool {
    let _transition = state.presence.transition(user.id).await;
    if !state.presence.unregister(user.id, connection_id) {
        tracing::info!(
            "[Gatekeeper] Superseded connection {} of {} closed",
            connection_id,
            user.id
        );
        return false;
    }

    for peer in state.typing.take_active(user.id) {
        state.presence.send_to(peer, ServerEvent::typing(user, false));
    }

    if let Err(e) = state
        .directory
        .set_presence(user.id, PresenceStatus::Offline, Utc::now())
        .await
    {
        tracing::error!("[Gatekeeper] Failed to record {} offline: {}", user.id, e);
    }

    broadcast_event(
        &state.realtime_broadcast,
        ServerEvent::status(user, PresenceStatus::Offline),
    );
    tracing::info!("[Gatekeeper] {} ({}) disconnected", user.username, user.id);
    true
}
