//! Error types for daybook-sync

use thiserror::Error;

/// Result type alias using daybook-sync's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in daybook-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// Change-feed transport error (subscribe/release failed)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Inbound change event was missing a required payload
    #[error("Malformed change event: {0}")]
    MalformedEvent(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
