//! Errors raised while (de)serializing the metadata envelope or driving the
//! streaming transform. Storage- and transport-level errors live in
//! `secsend-store`/`secsend-relay`.

use thiserror::Error;

/// Result type alias using [`ProtocolError`]
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors surfaced by this crate
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A sealed metadata field failed to encrypt or verify-decrypt
    #[error(transparent)]
    Crypto(#[from] secsend_crypto::CryptoError),

    /// A decrypted field wasn't the encoding the wire format promises
    /// (`name`/`mime_type` must be valid UTF-8)
    #[error("field '{field}' is not valid UTF-8")]
    InvalidEncoding {
        /// Which field failed to decode
        field: &'static str,
    },

    /// A fixed-size field (`iv`, `key_sign`, sealed `chunk_size`) had the
    /// wrong length after base64 decoding or AEAD opening
    #[error("field '{field}' must be {expected} bytes, got {actual}")]
    FieldLength {
        /// Which field had the wrong length
        field: &'static str,
        /// Required length
        expected: usize,
        /// Observed length
        actual: usize,
    },

    /// `upload/new`'s requested `timeout_s` isn't on the server's allow-list
    #[error("timeout_s {0} is not an accepted value")]
    InvalidTimeout(u64),

    /// Underlying I/O error from the source stream driving a transform
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> Self {
        ProtocolError::Io(e.to_string())
    }
}
