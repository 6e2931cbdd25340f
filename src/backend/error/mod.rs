//! Backend Error Module
//!
//! This module defines the error taxonomy of the server. Every operation
//! the core exposes returns `BackendError`, which can be rendered either
//! as an HTTP response or as an `error` event on a live connection.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Categories
//!
//! - authentication (`Unauthorized`) - fatal to a connection attempt only
//! - validation (`Validation`) - bad input on a single event
//! - authorization (`Forbidden`) - acting on someone else's message
//! - not found (`NotFound`) - unknown message or recipient
//! - infrastructure (`Database`, `Storage`, `SerializationError`) - reported
//!   to the client as a generic server error, logged in detail
//!
//! Only authentication errors ever end a connection.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
