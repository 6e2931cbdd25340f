//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer-token authentication for the REST routes

pub mod auth;

pub use auth::{auth_middleware, token_from_headers, AuthUser, AuthenticatedUser};
