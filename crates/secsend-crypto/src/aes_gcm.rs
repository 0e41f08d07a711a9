//! Thin AES-256-GCM wrapper used by [`crate::envelope::ChunkEnvelope`]

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};

use crate::error::{CryptoError, Result};

/// Encrypt `plaintext` under `key`/`nonce`, appending the 16-byte tag
pub fn encrypt(key: &[u8; 32], nonce: &[u8; 12], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());
    let payload = Payload {
        msg: plaintext,
        aad,
    };
    cipher
        .encrypt(Nonce::from_slice(nonce), payload)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypt `ciphertext` (tag included) under `key`/`nonce`
pub fn decrypt(key: &[u8; 32], nonce: &[u8; 12], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());
    let payload = Payload {
        msg: ciphertext,
        aad,
    };
    cipher
        .decrypt(Nonce::from_slice(nonce), payload)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let pt = b"hello world";
        let ct = encrypt(&key, &nonce, pt, b"").unwrap();
        let back = decrypt(&key, &nonce, &ct, b"").unwrap();
        assert_eq!(pt, back.as_slice());
    }

    #[test]
    fn wrong_key_fails() {
        let nonce = [1u8; 12];
        let ct = encrypt(&[1u8; 32], &nonce, b"secret", b"").unwrap();
        assert!(decrypt(&[2u8; 32], &nonce, &ct, b"").is_err());
    }
}
