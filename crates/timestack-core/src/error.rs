//! Error types for timestack operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimestackError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Interval not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimestackError>;
