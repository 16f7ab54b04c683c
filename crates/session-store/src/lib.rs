//! Durable session state for the JobberWobber client.
//!
//! This crate provides:
//! - The session data model (`Session`, `Profile`, `Role`)
//! - A pluggable key-value backend (`KeyValueStore`) with file and
//!   in-memory implementations
//! - The `SessionStore`, which persists exactly two keys, `token` and
//!   `user`, the way the browser client kept them in origin storage
//!
//! The file backend is shared by every client process of the same user,
//! so a login in one terminal is observable from the others.

mod file;
mod keys;
mod memory;
mod session;
mod store;
mod traits;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use session::{Profile, Role, Session};
pub use store::SessionStore;
pub use traits::KeyValueStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
