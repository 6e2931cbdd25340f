/**
 * API Routes
 *
 * # Public
 * - `GET /api/health` - Liveness and number of online users
 *
 * # Authenticated (bearer token)
 * - `GET /api/messages/conversations` - Conversation summaries
 * - `GET /api/messages/{id}` - Paginated history with the user `id`
 * - `POST /api/messages` - Send a message
 * - `POST /api/messages/{id}/read` - Mark a message as read
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::messaging::handlers::{
    create_message, get_messages_with, health, list_conversations, mark_as_read,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// The messaging routes share one authentication layer; `/api/health`
/// stays public. The router requires one parameter name per path
/// segment, so history and read receipts both capture `{id}`.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let messaging = Router::new()
        .route("/api/messages", post(create_message))
        .route("/api/messages/conversations", get(list_conversations))
        .route("/api/messages/{id}", get(get_messages_with))
        .route("/api/messages/{id}/read", post(mark_as_read))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router
        .route("/api/health", get(health))
        .merge(messaging)
}
