//! Common error types for CDG

use thiserror::Error;

/// Common result type for CDG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the CDG seeders
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Strict-mode mutation against an id that is not in the pool
    #[error("Unknown pool member: {0}")]
    UnknownPoolMember(String),

    /// Strict-mode mutation against an origin id with no chain
    #[error("Unknown chain origin: {0}")]
    UnknownChainOrigin(String),

    /// Chain already carries a follow-up id and overwrite was not requested
    #[error("Chain for origin {0} is already fulfilled")]
    ChainAlreadyFulfilled(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
