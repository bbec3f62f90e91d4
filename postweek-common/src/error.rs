//! Common error types for postweek

use thiserror::Error;

use crate::source::SourceError;

/// Common result type for postweek operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across postweek crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote date-source failure
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
