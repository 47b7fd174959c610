//! Error types for voyage-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object already exists: {0}")]
    ObjectExists(String),

    #[error("Remote error {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for voyage_core::Error {
    fn from(err: StorageError) -> Self {
        voyage_core::Error::Store(err.to_string())
    }
}
