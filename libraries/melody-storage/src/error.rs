/// Storage-specific errors
use melody_core::MelodyError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The document parsed but does not have the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Entity reconstruction failed
    #[error(transparent)]
    Data(#[from] MelodyError),

    /// JSON encoding or parsing error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// XML parsing error
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    /// Configuration loading error
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a malformed document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }
}
