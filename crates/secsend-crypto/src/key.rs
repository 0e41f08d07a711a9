//! The 16-byte symmetric file key and its base-36 textual encoding

use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

/// Number of bytes in a file key
pub const KEY_LEN: usize = 16;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The 16-byte symmetric secret shared between sender and recipient
///
/// Textual form is the base-36 encoding of the key read as a little-endian
/// unsigned integer, carried in the URL fragment so it never reaches the
/// server (see [`crate::id::ShareUrl`]).
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Zeroize for Key {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Key {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Render as base-36, little-endian, with leading zeros stripped
    pub fn to_base36(&self) -> String {
        // Treat the key as a big unsigned integer in base 2^8, little-endian.
        let mut digits: Vec<u8> = self.0.to_vec();
        digits.reverse(); // now big-endian, most significant byte first

        let mut out = Vec::new();
        while !digits.iter().all(|&d| d == 0) {
            let mut remainder: u32 = 0;
            for d in digits.iter_mut() {
                let acc = (remainder << 8) | (*d as u32);
                *d = (acc / 36) as u8;
                remainder = acc % 36;
            }
            out.push(BASE36_ALPHABET[remainder as usize]);
        }

        if out.is_empty() {
            "0".to_string()
        } else {
            out.reverse();
            String::from_utf8(out).expect("base36 alphabet is ASCII")
        }
    }

    /// Parse a base-36 string back into a key, left-padding to [`KEY_LEN`] bytes
    pub fn from_base36(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self([0u8; KEY_LEN]));
        }

        let mut magnitude: Vec<u8> = vec![0];
        for c in s.chars() {
            let digit = BASE36_ALPHABET
                .iter()
                .position(|&b| b == c.to_ascii_lowercase() as u8)?
                as u32;

            let mut carry = digit;
            for limb in magnitude.iter_mut() {
                let acc = (*limb as u32) * 36 + carry;
                *limb = (acc & 0xff) as u8;
                carry = acc >> 8;
            }
            while carry > 0 {
                magnitude.push((carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        if magnitude.len() > KEY_LEN {
            return None;
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes[..magnitude.len()].copy_from_slice(&magnitude);
        Some(Self(bytes))
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&"<REDACTED>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_roundtrip() {
        for _ in 0..64 {
            let key = Key::generate();
            let txt = key.to_base36();
            let back = Key::from_base36(&txt).unwrap();
            assert_eq!(key, back);
        }
    }

    #[test]
    fn base36_zero_key() {
        let key = Key::from_bytes([0u8; KEY_LEN]);
        assert_eq!(key.to_base36(), "0");
        let back = Key::from_base36("0").unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn base36_empty_fragment_is_zero_key() {
        let back = Key::from_base36("").unwrap();
        assert_eq!(back, Key::from_bytes([0u8; KEY_LEN]));
    }

    #[test]
    fn base36_case_insensitive() {
        let key = Key::generate();
        let txt = key.to_base36().to_uppercase();
        let back = Key::from_base36(&txt).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn base36_overflow_rejected() {
        // 16 bytes of 0xff in base 36 needs a specific digit count; one more
        // digit than that always overflows 16 bytes.
        let max_key = Key::from_bytes([0xff; KEY_LEN]);
        let txt = max_key.to_base36();
        let overflowing = format!("z{}", txt);
        assert!(Key::from_base36(&overflowing).is_none());
    }
}
