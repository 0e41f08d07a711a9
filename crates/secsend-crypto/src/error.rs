//! Error types for ID parsing and AEAD chunk operations

use thiserror::Error;

/// Result type alias using [`CryptoError`]
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur while handling IDs or the chunk envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Textual ID failed to base64url-decode, or decoded to the wrong length
    #[error("invalid ID '{0}'")]
    IdInvalid(String),

    /// The ID's kind byte didn't match the kind the caller required
    #[error("wrong type for ID '{0}'")]
    IdWrongType(String),

    /// AEAD encryption failed (only on oversized input, never on valid keys)
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// AEAD decryption/authentication failed — tampering or wrong key
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// I/O error surfaced from a best-effort memory-protection call
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CryptoError {
    fn from(e: std::io::Error) -> Self {
        CryptoError::Io(e.to_string())
    }
}
