//! Error types for SheetBridge.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Cache errors
    #[error("Lock not acquired within {waited_ms} ms")]
    LockTimeout { waited_ms: u64 },

    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Failed to decode cached payload: {0}")]
    Decode(String),

    #[error("Compression error: {0}")]
    Compression(String),

    // Property errors
    #[error("Property storage error: {0}")]
    Storage(String),

    // Spreadsheet errors
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid write directive: {0}")]
    InvalidDirective(String),

    // Database errors
    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Database error: {0}")]
    Database(String),

    // Infrastructure errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
