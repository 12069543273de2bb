//! Error types for perch.

use thiserror::Error;

/// Result type alias for perch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in perch operations.
///
/// Per-candidate plugin and autostart failures are deliberately absent here:
/// discovery degrades them to logged skips, never to an `Err`.
#[derive(Error, Debug)]
pub enum Error {
    // Session errors
    #[error("home directory could not be resolved: {0}")]
    HomeResolutionFailed(String),

    // Extension errors
    #[error("service start failed: {0}")]
    ServiceStartFailed(String),

    #[error("face initialization failed: {0}")]
    FaceInitFailed(String),

    // Serialization errors
    #[error("serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
