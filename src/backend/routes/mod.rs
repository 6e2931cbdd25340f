//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation and layers
//! ├── realtime_routes.rs - WebSocket endpoint
//! └── api_routes.rs      - REST endpoints
//! ```

pub mod api_routes;
pub mod realtime_routes;
pub mod router;

pub use router::create_router;
