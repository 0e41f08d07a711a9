//! # secsend-protocol
//!
//! The encrypted metadata envelope, the resumable streaming chunk
//! transform, and the JSON shapes the relay speaks over HTTP.
//!
//! - [`metadata`] — [`metadata::FileMetadata`] / [`metadata::EncryptedFileMetadata`]
//!   and the seal/open functions between them.
//! - [`transform`] — [`transform::StreamTransform`], the resumable chunk
//!   pipeline built on [`secsend_crypto::envelope::ChunkEnvelope`].
//! - [`wire`] — request/response bodies for the `/v1` endpoints.

#![forbid(unsafe_code)]

pub mod error;
pub mod metadata;
pub mod transform;
pub mod wire;

pub use error::ProtocolError;
pub use metadata::{decrypt_metadata, encrypt_metadata, EncryptedFileMetadata, FileMetadata};
pub use transform::{ChunkPlan, StreamTransform};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
