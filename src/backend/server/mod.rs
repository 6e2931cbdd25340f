//! Server Module
//!
//! State construction and start-up.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Store selection and database loading
//! └── init.rs   - State and router creation
//! ```

/// Application state management
pub mod state;

/// Store selection
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, create_state};
pub use state::AppState;
