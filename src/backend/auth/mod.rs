//! Authentication Module
//!
//! Credential checks and access to the user directory.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── sessions.rs  - JWT verification and `authenticate`
//! ├── directory.rs - `UserDirectory` trait and in-memory implementation
//! └── users.rs     - Postgres-backed directory
//! ```
//!
//! # Authentication Flow
//!
//! 1. The client presents a bearer token (header, or `?token=` on `/ws`)
//! 2. The token signature and expiry are checked
//! 3. The subject is looked up in the directory
//! 4. The resulting `PublicUser` becomes the identity of the request or
//!    connection
//!
//! Missing, invalid and expired credentials are reported distinctly.

/// JWT token verification
pub mod sessions;

/// Directory trait and in-memory store
pub mod directory;

/// Postgres user directory
pub mod users;

pub use directory::{InMemoryDirectory, UserDirectory};
pub use sessions::{authenticate, create_token, verify_token, AuthError, Claims};
pub use users::PgUserDirectory;
