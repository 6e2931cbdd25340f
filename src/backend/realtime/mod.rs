//! Real-time Module
//!
//! Live connections and presence.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── presence.rs   - Presence registry (who is reachable, and how)
//! ├── broadcast.rs  - Presence broadcast to every connection
//! ├── gatekeeper.rs - Connection authentication, admission and release
//! └── socket.rs     - `GET /ws` and the per-connection tasks
//! ```
//!
//! # Event Routing
//!
//! Events for one user (messages, read receipts, typing) are routed
//! through the presence registry to that user's current connection.
//! Presence changes are broadcast to every connection.

/// Presence registry
pub mod presence;

/// Presence broadcasting
pub mod broadcast;

/// Connection lifecycle
pub mod gatekeeper;

/// WebSocket endpoint
pub mod socket;

pub use broadcast::{broadcast_event, RealtimeEventBroadcast};
pub use gatekeeper::{admit, authenticate_connection, connect, release, Session};
pub use presence::{ConnectionHandle, PresenceRegistry, PresenceTransition};
pub use socket::handle_socket_upgrade;
