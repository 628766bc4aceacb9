use thiserror::Error;

/// Faults that abort an operation. Remote model failures are not in here:
/// those are recorded per attempt and never surface as errors.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GenError>;
