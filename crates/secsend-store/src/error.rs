//! Typed errors for the object store, matching the error kinds the relay
//! maps to HTTP status codes.

use thiserror::Error;

/// Result type alias using [`StoreError`]
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors the object store can raise
#[derive(Error, Debug)]
pub enum StoreError {
    /// Exclusive-create collided with an existing metadata file
    #[error("ID already exists")]
    IdExists,

    /// No live object at this path (includes expired objects, which are
    /// deleted on access and reported the same way)
    #[error("unknown ID")]
    IdUnknown,

    /// The stored metadata file didn't parse as JSON
    #[error("invalid metadata")]
    InvalidMetadata,

    /// Another writer currently holds the `.lock` sidecar
    #[error("file locked")]
    FileLocked,

    /// Underlying filesystem error not covered by a more specific variant
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
