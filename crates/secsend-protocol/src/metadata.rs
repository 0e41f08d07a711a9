//! The file metadata envelope: plaintext on the sender's side, partially
//! AEAD-sealed on the wire.
//!
//! Only `name`, `mime_type`, and `chunk_size` are sealed — `iv` and
//! `key_sign` travel in the clear, since `key_sign` only proves possession
//! of the key and `iv` is needed by the recipient before they hold the key
//! material to open anything else.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use secsend_crypto::envelope::{meta_idx, ChunkEnvelope};

use crate::error::{ProtocolError, Result};

/// The only AEAD algorithm this wire format currently names
pub const ALGO: &str = "aes-gcm";

/// Metadata as the sender holds it: nothing here is sealed yet
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Original filename
    pub name: String,
    /// MIME type, ASCII
    pub mime_type: String,
    /// The file's base IV
    pub iv: [u8; 12],
    /// Plaintext chunk size in bytes
    pub chunk_size: u32,
    /// Key-proof token, `sign_key(key, iv)`
    pub key_sign: [u8; 32],
    /// Requested TTL in seconds, 0 = never expire
    pub timeout_s: u64,
    /// Always `false` on the sender's side; the server owns this field
    pub complete: bool,
    /// Always [`ALGO`] today
    pub algo: String,
    /// Wire format version, currently always 1
    pub version: u32,
}

impl FileMetadata {
    /// A fresh, not-yet-uploaded metadata record
    pub fn new(name: String, mime_type: String, iv: [u8; 12], chunk_size: u32, key_sign: [u8; 32], timeout_s: u64) -> Self {
        Self {
            name,
            mime_type,
            iv,
            chunk_size,
            key_sign,
            timeout_s,
            complete: false,
            algo: ALGO.to_string(),
            version: 1,
        }
    }
}

fn b64_field<S: serde::Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(bytes))
}

fn b64_field_de<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Vec<u8>, D::Error> {
    let s = String::deserialize(d)?;
    STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
}

/// The wire envelope: `name`/`mime_type`/`chunk_size` are AEAD-sealed
/// ciphertext; every byte field is base64-standard-encoded in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedFileMetadata {
    /// Sealed `name`
    #[serde(serialize_with = "b64_field", deserialize_with = "b64_field_de")]
    pub name: Vec<u8>,
    /// Sealed `mime_type`
    #[serde(serialize_with = "b64_field", deserialize_with = "b64_field_de")]
    pub mime_type: Vec<u8>,
    /// Base IV, in the clear
    #[serde(serialize_with = "b64_field", deserialize_with = "b64_field_de")]
    pub iv: Vec<u8>,
    /// Sealed little-endian `u32` `chunk_size`
    #[serde(serialize_with = "b64_field", deserialize_with = "b64_field_de")]
    pub chunk_size: Vec<u8>,
    /// Key-proof token, in the clear
    #[serde(serialize_with = "b64_field", deserialize_with = "b64_field_de")]
    pub key_sign: Vec<u8>,
    /// Requested TTL in seconds
    pub timeout_s: u64,
    /// Absolute UTC expiry timestamp, set by the server at `upload/finish`
    #[serde(default)]
    pub timeout_ts: f64,
    /// Set by the server, never by the client
    #[serde(default)]
    pub complete: bool,
    /// AEAD algorithm name
    pub algo: String,
    /// Wire format version
    pub version: u32,
}

impl EncryptedFileMetadata {
    /// Validate the fixed-length fields a JSON schema can't express
    pub fn validate(&self) -> Result<()> {
        if self.iv.len() != 12 {
            return Err(ProtocolError::FieldLength {
                field: "iv",
                expected: 12,
                actual: self.iv.len(),
            });
        }
        Ok(())
    }
}

/// Seal a sender-side [`FileMetadata`] into the wire [`EncryptedFileMetadata`]
pub fn encrypt_metadata(plain: &FileMetadata, envelope: &ChunkEnvelope) -> Result<EncryptedFileMetadata> {
    let name = envelope.seal_meta(meta_idx::NAME, plain.name.as_bytes(), b"")?;
    let mime_type = envelope.seal_meta(meta_idx::MIME_TYPE, plain.mime_type.as_bytes(), b"")?;
    let chunk_size = envelope.seal_meta(meta_idx::CHUNK_SIZE, &plain.chunk_size.to_le_bytes(), b"")?;

    Ok(EncryptedFileMetadata {
        name,
        mime_type,
        iv: plain.iv.to_vec(),
        chunk_size,
        key_sign: plain.key_sign.to_vec(),
        timeout_s: plain.timeout_s,
        timeout_ts: 0.0,
        complete: plain.complete,
        algo: plain.algo.clone(),
        version: plain.version,
    })
}

/// Open a wire [`EncryptedFileMetadata`] back into a [`FileMetadata`]
pub fn decrypt_metadata(encr: &EncryptedFileMetadata, envelope: &ChunkEnvelope) -> Result<FileMetadata> {
    encr.validate()?;

    let name_bytes = envelope.open_meta(meta_idx::NAME, &encr.name, b"")?;
    let name = String::from_utf8(name_bytes).map_err(|_| ProtocolError::InvalidEncoding { field: "name" })?;

    let mime_bytes = envelope.open_meta(meta_idx::MIME_TYPE, &encr.mime_type, b"")?;
    let mime_type = String::from_utf8(mime_bytes).map_err(|_| ProtocolError::InvalidEncoding { field: "mime_type" })?;

    let chunk_size_bytes = envelope.open_meta(meta_idx::CHUNK_SIZE, &encr.chunk_size, b"")?;
    let chunk_size_arr: [u8; 4] = chunk_size_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ProtocolError::FieldLength {
            field: "chunk_size",
            expected: 4,
            actual: chunk_size_bytes.len(),
        })?;
    let chunk_size = u32::from_le_bytes(chunk_size_arr);

    let iv: [u8; 12] = encr.iv.as_slice().try_into().map_err(|_| ProtocolError::FieldLength {
        field: "iv",
        expected: 12,
        actual: encr.iv.len(),
    })?;
    let key_sign: [u8; 32] = encr.key_sign.as_slice().try_into().map_err(|_| ProtocolError::FieldLength {
        field: "key_sign",
        expected: 32,
        actual: encr.key_sign.len(),
    })?;

    Ok(FileMetadata {
        name,
        mime_type,
        iv,
        chunk_size,
        key_sign,
        timeout_s: encr.timeout_s,
        complete: encr.complete,
        algo: encr.algo.clone(),
        version: encr.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secsend_crypto::envelope::Mode;
    use secsend_crypto::Key;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = Key::generate();
        let iv = [7u8; 12];
        let key_sign = secsend_crypto::envelope::sign_key(&key, &iv);

        let plain = FileMetadata::new(
            "report.pdf".to_string(),
            "application/pdf".to_string(),
            iv,
            1 << 20,
            key_sign,
            0,
        );

        let enc_env = ChunkEnvelope::new(iv, &key, Mode::Encrypt);
        let encrypted = encrypt_metadata(&plain, &enc_env).unwrap();

        let dec_env = ChunkEnvelope::new(iv, &key, Mode::Decrypt);
        let decrypted = decrypt_metadata(&encrypted, &dec_env).unwrap();

        assert_eq!(decrypted.name, plain.name);
        assert_eq!(decrypted.mime_type, plain.mime_type);
        assert_eq!(decrypted.chunk_size, plain.chunk_size);
        assert_eq!(decrypted.iv, plain.iv);
        assert_eq!(decrypted.key_sign, plain.key_sign);
    }

    #[test]
    fn wire_json_base64_roundtrip() {
        let key = Key::generate();
        let iv = [1u8; 12];
        let key_sign = [0u8; 32];
        let plain = FileMetadata::new("a".into(), "text/plain".into(), iv, 4096, key_sign, 60);
        let env = ChunkEnvelope::new(iv, &key, Mode::Encrypt);
        let encrypted = encrypt_metadata(&plain, &env).unwrap();

        let json = serde_json::to_string(&encrypted).unwrap();
        let back: EncryptedFileMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, encrypted.name);
        assert_eq!(back.iv, encrypted.iv);
        assert_eq!(back.timeout_s, 60);
    }

    #[test]
    fn rejects_wrong_iv_length() {
        let mut bad = EncryptedFileMetadata {
            name: vec![],
            mime_type: vec![],
            iv: vec![0u8; 11],
            chunk_size: vec![],
            key_sign: vec![0u8; 32],
            timeout_s: 0,
            timeout_ts: 0.0,
            complete: false,
            algo: ALGO.to_string(),
            version: 1,
        };
        assert!(bad.validate().is_err());
        bad.iv = vec![0u8; 12];
        assert!(bad.validate().is_ok());
    }
}
