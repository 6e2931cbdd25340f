//! Backend Module
//!
//! The messaging server: an Axum application with a WebSocket endpoint for
//! live events and a small REST surface for history and conversation
//! summaries.
//!
//! # Architecture
//!
//! - **`server`** - State construction and start-up
//! - **`routes`** - Router assembly and layers
//! - **`realtime`** - Presence registry, connection gatekeeper, socket loop
//! - **`messaging`** - Delivery, read receipts, typing, history, conversations
//! - **`auth`** - Token verification and the user directory
//! - **`middleware`** - REST authentication
//! - **`error`** - Backend error taxonomy
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports and documentation
//! ├── main.rs      - Server binary
//! ├── server/      - State and initialization
//! ├── routes/      - Route configuration
//! ├── realtime/    - Live connections and presence
//! ├── messaging/   - Message operations and stores
//! ├── auth/        - Credentials and user directory
//! ├── middleware/  - Request middleware
//! └── error/       - Error types
//! ```
//!
//! # Data Flow
//!
//! A connection is authenticated and registered by the gatekeeper. Each
//! inbound event is dispatched to one messaging operation, which persists
//! through the message archive and then routes any resulting events via
//! the presence registry. Conversation summaries and history are computed
//! on request from the archive.
//!
//! # Thread Safety
//!
//! The presence registry is the only table shared by every connection and
//! is guarded by a single mutex. Stores are `Send + Sync` trait objects.
//! Handlers for one connection run in arrival order; different connections
//! interleave freely.

/// Server setup and state
pub mod server;

/// Route configuration
pub mod routes;

/// Live connections and presence
pub mod realtime;

/// Backend error types
pub mod error;

/// Credentials and user directory
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Message operations and stores
pub mod messaging;

/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::{PresenceRegistry, RealtimeEventBroadcast};
pub use server::{create_app, AppState};
