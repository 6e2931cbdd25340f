/**
 * Parley Server Entry Point
 *
 * Loads configuration from the environment (and `.env` when present),
 * initializes tracing, and serves HTTP and WebSocket traffic.
 */

use parley::backend::server::create_app;
use parley::shared::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr;
    tracing::info!("[Startup] Server initialization started");

    let app = create_app(config).await;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Startup] Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
