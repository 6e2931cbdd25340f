//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and any client. These types are used for serialization over
//! the WebSocket event protocol and the read-side HTTP API.
//!
//! # Overview
//!
//! The shared module provides transport-agnostic types. Nothing here
//! touches the network, the database or process-wide state.

/// Message data structure and content rules
pub mod message;

/// Public user identity and presence status
pub mod user;

/// Real-time event protocol
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Read-side request and response bodies
pub mod messaging;

/// Re-export commonly used types for convenience
pub use message::{Message, MessageStatus, PopulatedMessage};
pub use user::{PresenceStatus, PublicUser};
pub use event::{ClientEvent, ServerEvent};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
