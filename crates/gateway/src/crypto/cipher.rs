//! AES-256-CBC encryption and decryption of credential payloads.
//!
//! **Algorithm choice:** AES-256-CBC with PKCS#7 padding and a fresh random IV
//! per value. Every envelope already in storage was written this way, so the
//! algorithm cannot change without a data migration.
//!
//! CBC is unauthenticated. A tampered ciphertext is rejected when it breaks the
//! padding or yields invalid UTF-8; anything that survives both is left to the
//! content parsers downstream to reject.

use std::sync::Arc;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use super::envelope::{Envelope, IV_LEN};
use super::key::{EncryptionKey, KEY_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key or IV handed to the block cipher has the wrong length.
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// The value is not a well-formed `iv:ciphertext` envelope.
    #[error("malformed encrypted envelope")]
    MalformedEnvelope,

    /// Wrong key, corrupted ciphertext, bad padding, or non-UTF-8 plaintext.
    #[error("decryption failed")]
    DecryptionFailed,
}

/// Encrypts and decrypts credential payloads under one injected key.
///
/// Cheap to clone; all clones share the same read-only key.
#[derive(Clone, Debug)]
pub struct CredentialCipher {
    key: Arc<EncryptionKey>,
}

impl CredentialCipher {
    /// Create a cipher bound to `key`.
    pub fn new(key: EncryptionKey) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Encrypt a UTF-8 payload into a new [`Envelope`].
    ///
    /// A random 128-bit IV is drawn from the OS CSPRNG on every call, so
    /// encrypting the same plaintext twice yields different envelopes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if the block cipher rejects the
    /// key (unreachable with a validated [`EncryptionKey`]).
    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope, CipherError> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|_| CipherError::InvalidKeyLength)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(Envelope { iv, ciphertext })
    }

    /// Parse an envelope string and decrypt it back to its UTF-8 payload.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if `envelope` does not parse, and
    /// [`CipherError::DecryptionFailed`] on a padding mismatch or non-UTF-8 output.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CipherError> {
        let envelope: Envelope = envelope.parse()?;
        self.decrypt_envelope(&envelope)
    }

    /// Decrypt an already-parsed [`Envelope`].
    ///
    /// # Errors
    ///
    /// See [`CredentialCipher::decrypt`].
    pub fn decrypt_envelope(&self, envelope: &Envelope) -> Result<String, CipherError> {
        let plaintext = Aes256CbcDec::new_from_slices(self.key.as_bytes(), &envelope.iv)
            .map_err(|_| CipherError::InvalidKeyLength)?
            .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_cipher() -> CredentialCipher {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        CredentialCipher::new(EncryptionKey::from_bytes(&key).unwrap())
    }

    fn fixed_cipher() -> CredentialCipher {
        CredentialCipher::new(EncryptionKey::from_bytes(&[0x42u8; KEY_LEN]).unwrap())
    }

    fn flip_hex(c: char) -> char {
        if c == '0' {
            '1'
        } else {
            '0'
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = fixed_cipher();
        for plaintext in [
            "",
            "a",
            "exactly16bytes!!",
            r#"{"client_id":"abc","client_secret":"xyz"}"#,
            "abc123:s3cr3t",
            "ñandú · 支付 · 💳",
        ] {
            let envelope = cipher.encrypt(plaintext).unwrap().to_string();
            assert_eq!(cipher.decrypt(&envelope).unwrap(), plaintext);
        }
    }

    #[test]
    fn same_plaintext_gets_fresh_iv() {
        let cipher = fixed_cipher();
        let a = cipher.encrypt("same payload").unwrap();
        let b = cipher.encrypt("same payload").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(cipher.decrypt_envelope(&a).unwrap(), "same payload");
        assert_eq!(cipher.decrypt_envelope(&b).unwrap(), "same payload");
    }

    #[test]
    fn envelope_shape() {
        let envelope = fixed_cipher().encrypt("hello").unwrap().to_string();
        let (iv, ct) = envelope.split_once(':').unwrap();
        assert_eq!(iv.len(), IV_LEN * 2);
        assert_eq!(ct.len(), 32);
        assert!(envelope.chars().all(|c| c == ':' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let envelope = random_cipher().encrypt("secret").unwrap().to_string();
        assert!(random_cipher().decrypt(&envelope).is_err());
    }

    #[test]
    fn malformed_envelope_is_reported() {
        let cipher = fixed_cipher();
        assert_eq!(
            cipher.decrypt("not-an-envelope"),
            Err(CipherError::MalformedEnvelope)
        );
        assert_eq!(cipher.decrypt("a:b:c"), Err(CipherError::MalformedEnvelope));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let cipher = fixed_cipher();
        // A 16-byte payload is followed by a full padding block, so any change to
        // the first ciphertext block corrupts the padding deterministically.
        let envelope = cipher.encrypt("exactly16bytes!!").unwrap().to_string();
        let sep = envelope.find(':').unwrap();
        for offset in 1..=32 {
            let mut chars: Vec<char> = envelope.chars().collect();
            chars[sep + offset] = flip_hex(chars[sep + offset]);
            let tampered: String = chars.into_iter().collect();
            assert_eq!(
                cipher.decrypt(&tampered),
                Err(CipherError::DecryptionFailed),
                "flip at ciphertext offset {offset} went undetected"
            );
        }
    }

    #[test]
    fn tampered_last_block_never_returns_original() {
        let cipher = fixed_cipher();
        let envelope = cipher.encrypt("tamper me").unwrap().to_string();
        let mut chars: Vec<char> = envelope.chars().collect();
        let last = chars.len() - 1;
        chars[last] = flip_hex(chars[last]);
        let tampered: String = chars.into_iter().collect();
        assert_ne!(cipher.decrypt(&tampered).ok().as_deref(), Some("tamper me"));
    }
}
