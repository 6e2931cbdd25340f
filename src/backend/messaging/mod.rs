//! Messaging Module
//!
//! The message-level operations of the realtime core and their REST
//! surface.
//!
//! # Module Structure
//!
//! ```text
//! messaging/
//! ├── mod.rs           - Module exports and documentation
//! ├── archive.rs       - `MessageArchive` trait and in-memory store
//! ├── db.rs            - Postgres archive
//! ├── delivery.rs      - Validate, persist, deliver
//! ├── receipts.rs      - Read receipts
//! ├── history.rs       - Paginated history with bulk mark-as-read
//! ├── typing.rs        - Typing relay
//! ├── conversations.rs - Per-peer conversation summaries
//! ├── dispatch.rs      - Inbound socket event dispatch
//! └── handlers.rs      - HTTP handlers
//! ```

pub mod archive;
pub mod conversations;
pub mod db;
pub mod delivery;
pub mod dispatch;
pub mod handlers;
pub mod history;
pub mod receipts;
pub mod typing;

pub use archive::{InMemoryArchive, MessageArchive, StatusUpdate};
pub use db::PgMessageArchive;
pub use delivery::{send_message, Delivery};
pub use dispatch::dispatch;
pub use receipts::{mark_read, ReadReceipt};
pub use typing::{relay_typing, TypingState};
