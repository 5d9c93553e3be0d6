//! Error types for map generation

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum MapError {
    /// A caller passed an out-of-range or non-finite argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A threshold table is unsorted or lacks its 0-value catch-all
    #[error("invalid threshold table: {0}")]
    InvalidThresholdTable(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MapError::InvalidArgument(msg.into())
    }
}
