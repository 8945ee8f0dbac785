//! The `iv:ciphertext` string envelope every encrypted credential is stored as.

use std::fmt;
use std::str::FromStr;

use super::cipher::CipherError;

/// Byte length of an AES-CBC initialisation vector (one block).
pub const IV_LEN: usize = 16;

/// AES block size; every CBC ciphertext is a whole number of blocks.
pub const BLOCK_LEN: usize = 16;

/// A parsed, encrypted value.
///
/// The string representation is `<hex(iv)>:<hex(ciphertext)>`, lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw ciphertext bytes (PKCS#7 padded, so never empty).
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for Envelope {
    type Err = CipherError;

    /// Parse an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] unless the string is exactly two
    /// non-empty hex segments joined by one `:`, the first decoding to
    /// [`IV_LEN`] bytes and the second to a whole number of blocks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [iv_hex, ct_hex] = parts.as_slice() else {
            return Err(CipherError::MalformedEnvelope);
        };
        if iv_hex.is_empty() || ct_hex.is_empty() {
            return Err(CipherError::MalformedEnvelope);
        }

        let iv_bytes = hex::decode(iv_hex).map_err(|_| CipherError::MalformedEnvelope)?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|_| CipherError::MalformedEnvelope)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::MalformedEnvelope)?;
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::MalformedEnvelope);
        }

        Ok(Self { iv, ciphertext })
    }
}
