use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Slug generation failed: {0}")]
    SlugGeneration(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Video index {index} out of range (len {len})")]
    VideoIndex { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
