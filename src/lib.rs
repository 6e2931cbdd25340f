//! Parley - Main Library
//!
//! Parley is a one-to-one real-time messaging server. Two authenticated
//! users exchange short text messages with delivery acknowledgment, read
//! receipts, typing notification and online/offline presence, while a
//! durable archive keeps the full history for paging and conversation
//! summaries.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and clients
//!   - Message and user records, content rules
//!   - The WebSocket event protocol
//!   - Read-side request/response bodies, configuration, error types
//!
//! - **`backend`** - The server
//!   - Axum HTTP server with a WebSocket endpoint
//!   - Presence registry and connection gatekeeper
//!   - Delivery, read receipts, typing, history and conversation summaries
//!   - Postgres and in-memory stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use parley::backend::server::create_app;
//! use parley::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let addr = config.bind_addr;
//! let app = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The presence registry and typing table sit behind one mutex each
//! - Stores are `Send + Sync` trait objects behind `Arc`
//! - Presence changes fan out over `tokio::sync::broadcast`
//!
//! # Error Handling
//!
//! - `shared::SharedError` for wire-level validation
//! - `backend::BackendError` for every operation, mapped to HTTP statuses
//!   and to socket `error` events

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
