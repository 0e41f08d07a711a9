//! Chunked AEAD envelope: per-chunk nonce derivation, key derivation, and
//! the key-proof token a server can verify without learning the key.
//!
//! A chunk's nonce is derived by adding its index onto the low 64 bits of a
//! random 12-byte base IV. Per chunk, a fresh AES-GCM call authenticates
//! that chunk independently, which is what lets both ends seek to any
//! chunk boundary (see [`crate::id`] and the streaming transform in
//! `secsend-protocol`).

use sha2::{Digest, Sha256};

use crate::aes_gcm;
use crate::error::{CryptoError, Result};
use crate::key::Key;
use crate::mem::ct_eq;

/// Byte length of a base IV
pub const IV_LEN: usize = 12;
/// AES-GCM authentication tag size
pub const TAG_SIZE: usize = 16;

/// Whether a [`ChunkEnvelope`] encrypts or decrypts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plaintext chunks in, ciphertext chunks out
    Encrypt,
    /// Ciphertext chunks in, plaintext chunks out
    Decrypt,
}

fn derive_key(prefix: &[u8], key: &Key) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}

/// `SHA-256("secsend_sign" || iv || key)` — lets a downloader detect a wrong
/// key before touching any ciphertext
pub fn sign_key(key: &Key, iv: &[u8; IV_LEN]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"secsend_sign");
    hasher.update(iv);
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}

/// Constant-time check that `sign` is the key-proof for `key`/`iv`
pub fn verify_key(sign: &[u8; 32], key: &Key, iv: &[u8; IV_LEN]) -> bool {
    let expected = sign_key(key, iv);
    ct_eq(&expected, sign)
}

fn chunk_nonce(iv: &[u8; IV_LEN], chunk_idx: u64) -> [u8; IV_LEN] {
    let base = u64::from_le_bytes(iv[..8].try_into().unwrap());
    let n = base.wrapping_add(chunk_idx);
    let mut nonce = [0u8; IV_LEN];
    nonce[..8].copy_from_slice(&n.to_le_bytes());
    nonce[8..].copy_from_slice(&iv[8..]);
    nonce
}

/// Indices used by [`ChunkEnvelope::seal_meta`]/[`ChunkEnvelope::open_meta`]
pub mod meta_idx {
    /// `name` field
    pub const NAME: u64 = 0;
    /// `mime_type` field
    pub const MIME_TYPE: u64 = 1;
    /// `chunk_size` field
    pub const CHUNK_SIZE: u64 = 2;
}

/// Stateful per-file chunk processor: one instance per upload or download,
/// never shared across transfers.
pub struct ChunkEnvelope {
    iv: [u8; IV_LEN],
    file_key: [u8; 32],
    meta_key: [u8; 32],
    mode: Mode,
    chunk_idx: u64,
}

impl ChunkEnvelope {
    /// Derive sub-keys and start a fresh envelope at chunk index 0
    pub fn new(iv: [u8; IV_LEN], key: &Key, mode: Mode) -> Self {
        Self {
            iv,
            file_key: derive_key(b"secsend_file", key),
            meta_key: derive_key(b"secsend_meta", key),
            mode,
            chunk_idx: 0,
        }
    }

    /// Current chunk index
    pub fn chunk_idx(&self) -> u64 {
        self.chunk_idx
    }

    /// Jump directly to a chunk index with no I/O
    pub fn seek_chunk_idx(&mut self, idx: u64) {
        self.chunk_idx = idx;
    }

    /// Encrypt (or decrypt, per `mode`) one chunk and advance `chunk_idx`
    pub fn process(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() >= (1usize << 32).min(usize::MAX) {
            return Err(CryptoError::Encryption(
                "chunk exceeds the AES-GCM 2^32-byte counter limit".to_string(),
            ));
        }
        let nonce = chunk_nonce(&self.iv, self.chunk_idx);
        let out = match self.mode {
            Mode::Encrypt => aes_gcm::encrypt(&self.file_key, &nonce, data, b"")?,
            Mode::Decrypt => aes_gcm::decrypt(&self.file_key, &nonce, data, b"")?,
        };
        self.chunk_idx += 1;
        Ok(out)
    }

    /// One-shot AEAD seal of a metadata field at a fixed index (see [`meta_idx`])
    pub fn seal_meta(&self, idx: u64, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let nonce = chunk_nonce(&self.iv, idx);
        aes_gcm::encrypt(&self.meta_key, &nonce, plaintext, aad)
    }

    /// One-shot AEAD open of a metadata field at a fixed index (see [`meta_idx`])
    pub fn open_meta(&self, idx: u64, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let nonce = chunk_nonce(&self.iv, idx);
        aes_gcm::decrypt(&self.meta_key, &nonce, ciphertext, aad)
    }

    /// Output size of one chunk of `in_chunk_size` input bytes
    pub fn out_chunk_size(&self, in_chunk_size: usize) -> usize {
        match self.mode {
            Mode::Encrypt => in_chunk_size + TAG_SIZE,
            Mode::Decrypt => in_chunk_size - TAG_SIZE,
        }
    }

    /// Total output size for `total_in` input bytes, chunked at
    /// `plain_chunk_size` plaintext bytes per chunk
    pub fn out_size(&self, total_in: u64, plain_chunk_size: u64) -> u64 {
        let (in_chunk_size, out_chunk_size) = match self.mode {
            Mode::Encrypt => (plain_chunk_size, plain_chunk_size + TAG_SIZE as u64),
            Mode::Decrypt => (plain_chunk_size + TAG_SIZE as u64, plain_chunk_size),
        };

        let nchunks = total_in / in_chunk_size;
        let mut ret = nchunks * out_chunk_size;
        let rem = total_in % in_chunk_size;
        if rem > 0 {
            ret += match self.mode {
                Mode::Encrypt => rem + TAG_SIZE as u64,
                Mode::Decrypt => rem - TAG_SIZE as u64,
            };
        }
        ret
    }
}
