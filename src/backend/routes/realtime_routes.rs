/**
 * Real-time Routes
 *
 * - `GET /ws` - WebSocket endpoint; authenticates from the bearer header
 *   or the `token` query parameter
 */

use axum::{routing::get, Router};

use crate::backend::realtime::socket::handle_socket_upgrade;
use crate::backend::server::state::AppState;

/// Configure real-time routes
pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/ws", get(handle_socket_upgrade))
}
