/**
 * Router Configuration
 *
 * Combines the route groups into a single router and applies the
 * cross-cutting layers.
 *
 * # Layers
 *
 * Applied as one `ServiceBuilder` stack, outermost first:
 *
 * - `TraceLayer` - one span per HTTP request
 * - `CorsLayer` - any origin, for browser clients served elsewhere
 */

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// - `GET /ws` - WebSocket endpoint
/// - `GET /api/health` - Liveness check
/// - `/api/messages/...` - Messaging REST surface (authenticated)
///
/// Unknown routes return 404.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_realtime_routes(Router::new());
    let router = configure_api_routes(router, &app_state);

    router
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
