//! [`EncryptionKey`]: the 256-bit key every credential envelope is encrypted under.

use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Errors produced while loading the encryption key.
///
/// Messages report lengths only, never key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// No key was configured.
    #[error("encryption key is not configured")]
    Missing,

    /// The configured value is not valid hex.
    #[error("encryption key must be hex-encoded ({hex_len} hex characters)", hex_len = KEY_LEN * 2)]
    NotHex,

    /// The decoded key material has the wrong length.
    #[error("invalid encryption key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct EncryptionKey(Box<[u8; KEY_LEN]>);

impl EncryptionKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if `bytes` is not [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Build a key from its hex encoding (64 characters, surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] for an empty value, [`KeyError::NotHex`] for
    /// non-hex input and [`KeyError::InvalidLength`] when the decoded length is wrong.
    pub fn from_hex(encoded: &str) -> Result<Self, KeyError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(KeyError::Missing);
        }
        let mut bytes = hex::decode(encoded).map_err(|_| KeyError::NotHex)?;
        let key = Self::from_bytes(&bytes);
        bytes.iter_mut().for_each(|b| *b = 0);
        key
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl TryFrom<String> for EncryptionKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl Drop for EncryptionKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("EncryptionKey([REDACTED])")
    }
}
