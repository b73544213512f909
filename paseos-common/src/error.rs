//! Common error types for Paseos

use thiserror::Error;

/// Common result type for Paseos operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Paseos crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote document store transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Guidebook document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Journey has no destinations to engage
    #[error("Journey has no destinations: {0}")]
    EmptyJourney(String),

    /// Store rejected a write or returned an unusable response
    #[error("Store error: {0}")]
    Store(String),

    /// Host capability (window, notification) failed
    #[error("Host error: {0}")]
    Host(String),
}
