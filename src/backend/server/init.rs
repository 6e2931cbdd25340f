/**
 * Server Initialization
 *
 * Builds the application state from a validated configuration and wires
 * it into the router.
 *
 * # Initialization Steps
 *
 * 1. **Load Stores**: Postgres when configured and reachable, in-memory otherwise
 * 2. **Create State**: empty presence registry, typing table, presence broadcast
 * 3. **Create Router**: REST routes, the socket endpoint, CORS and tracing layers
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_stores;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create the application state for `config`
pub async fn create_state(config: AppConfig) -> AppState {
    let stores = load_stores(config.database_url.as_deref()).await;
    AppState::new(config, stores.directory, stores.archive)
}

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing parley server");
    let app_state = create_state(config).await;
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
