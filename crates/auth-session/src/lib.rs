//! Process-wide authentication state for the JobberWobber client.
//!
//! This crate provides:
//! - The `SessionManager`, the single source of truth the rest of the
//!   UI reads session state from
//! - Validation of authentication responses before any state changes

mod manager;

pub use manager::SessionManager;

use session_store::StorageError;
use thiserror::Error;

/// Error type for session operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The authentication backend returned a success payload missing
    /// the access token or the user id.
    #[error("malformed authentication response: {0}")]
    InvalidResponse(&'static str),

    /// The operation requires a logged-in session.
    #[error("not logged in")]
    NotAuthenticated,

    /// Session persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for session operations.
pub type AuthResult<T> = Result<T, AuthError>;
