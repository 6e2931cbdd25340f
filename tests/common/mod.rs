//! Common test utilities and helpers
//!
//! - `TestApp` - application state over in-memory stores
//! - Authentication helpers for minting tokens
//! - Session helpers for draining the events a connection received

pub mod auth_helpers;
pub mod session;

pub use auth_helpers::*;
pub use fixture::*;
pub use session::*;
