//! # secsend-crypto
//!
//! ID codec and AEAD chunk envelope for the secsend zero-knowledge file
//! relay. Everything in this crate runs client-side: the key never leaves
//! this crate's callers, and nothing here talks to the network or disk.
//!
//! - [`id`] — tagged object identifiers ([`id::FileId`], [`id::RootId`]) and
//!   the [`id::ShareUrl`] they're carried in.
//! - [`key`] — the 16-byte symmetric [`key::Key`] and its base-36 wire form.
//! - [`envelope`] — the chunked AEAD transform, key-proof, and sub-key
//!   derivation in [`envelope::ChunkEnvelope`].
//! - [`aes_gcm`] — the raw AES-256-GCM primitive `envelope` is built on.
//! - [`mem`] — constant-time comparison and best-effort memory hardening.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aes_gcm;
pub mod envelope;
pub mod error;
pub mod id;
pub mod key;
pub mod mem;

pub use envelope::{ChunkEnvelope, Mode};
pub use error::{CryptoError, Result};
pub use id::{AnyId, FileId, RootId, ShareUrl};
pub use key::Key;

/// Initialize process-wide memory hardening (best-effort, safe to skip)
pub fn init() -> Result<()> {
    mem::wipe::prevent_core_dumps()?;
    Ok(())
}
