//! Messaging Module
//!
//! Request and response bodies of the read-side HTTP API:
//!
//! - `ConversationSummary` - one entry of the per-peer conversation list
//! - `HistoryPage` - one page of the message history with a peer
//!
//! # Usage
//!
//! ```rust
//! use parley::shared::messaging::{ConversationSummary, HistoryPage, HistoryParams};
//! ```

pub mod conversation;
pub mod history;

// Re-export all types
pub use conversation::{ConversationSummary, ListConversationsResponse};
pub use history::{HistoryPage, HistoryParams, Pagination};
