/**
 * WebSocket Endpoint
 *
 * `GET /ws` authenticates, upgrades, and then runs two tasks per
 * connection until either side stops:
 *
 * - the writer drains the connection's routed events and the global
 *   presence feed into the socket
 * - the reader parses each text frame and dispatches it, one at a time,
 *   in arrival order
 *
 * # Credential
 *
 * The token comes from `Authorization: Bearer <token>` or, for clients
 * that cannot set headers on an upgrade, `?token=<token>`. A rejected
 * credential gets a 401 JSON response and no upgrade.
 */

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::messaging::dispatch::dispatch;
use crate::backend::middleware::token_from_headers;
use crate::backend::realtime::gatekeeper::{self, Session};
use crate::backend::server::state::AppState;
use crate::shared::{ClientEvent, PublicUser, ServerEvent};

/// Reply to a frame that is not a known event
pub const MALFORMED_EVENT: &str = "malformed event";

/// Query string of `GET /ws`
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Handle a connection attempt (GET /ws)
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ConnectQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let token = token_from_headers(&headers).map(str::to_owned).or(query.token);

    let user = match gatekeeper::authenticate_connection(&state, token.as_deref()).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| run_socket(socket, state, user)),
        Err(rejection) => {
            tracing::warn!("[Socket] Upgrade failed for {}: {}", user.id, rejection);
            rejection.into_response()
        }
    }
}

async fn run_socket(socket: WebSocket, state: AppState, user: PublicUser) {
    let Session {
        user,
        connection_id,
        handle,
        mut events,
        mut broadcasts,
    } = gatekeeper::admit(&state, user).await;

    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                routed = events.recv() => match routed {
                    Some(event) => event,
                    None => break,
                },
                broadcast = broadcasts.recv() => match broadcast {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("[Socket] Connection {} lagged, skipped {} broadcasts", connection_id, skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            };

            let frame = match event.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode {}: {}", event.name(), e);
                    continue;
                }
            };
            if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                tracing::debug!("[Socket] Write to {} failed, closing", connection_id);
                break;
            }
        }
    });

    let reader_state = state.clone();
    let reader_user = user.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                WsMessage::Text(text) => {
                    let reply = match ClientEvent::from_frame(text.as_str()) {
                        Ok(event) => dispatch(&reader_state, &reader_user, event).await,
                        Err(e) => {
                            tracing::warn!("[Socket] Malformed frame from {}: {}", reader_user.id, e);
                            Some(ServerEvent::error(MALFORMED_EVENT))
                        }
                    };
                    if let Some(reply) = reply {
                        if !handle.send(reply) {
                            break;
                        }
                    }
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    gatekeeper::release(&state, &user, connection_id).await;
}
