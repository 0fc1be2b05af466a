//! # ForumError
//!
//! Centralized error handling for the Emberboard ecosystem.
//! Every remote failure is caught at the adapter boundary and mapped
//! here; callers above the ports never see a transport error type.

use thiserror::Error;

/// The primary error type for all forum operations.
#[derive(Error, Debug)]
pub enum ForumError {
    /// Resource not found (e.g., Post, Profile)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Precondition failure: the operation requires a signed-in
    /// identity and none is resolved. Raised before any remote call.
    #[error("you must log in first")]
    NotLoggedIn,

    /// The hosted service rejected or failed the call (transport,
    /// auth endpoint, or table endpoint).
    #[error("remote service error: {0}")]
    Remote(String),

    /// Bad or missing configuration (endpoint, key, mode)
    #[error("configuration error: {0}")]
    Config(String),
}

/// A specialized Result type for Emberboard logic.
pub type Result<T> = std::result::Result<T, ForumError>;
