//! AES-256-CBC encryption of credential payloads under a single process-wide key.
//!
//! This module is intentionally free of HTTP and storage dependencies.
//! It provides the envelope format and the encrypt/decrypt operations used by
//! the credential layer.
//!
//! # Ciphertext format
//!
//! ```text
//! <hex(iv), 32 chars>:<hex(ciphertext)>
//! ```
//!
//! The format carries no version tag or MAC. Values already persisted in this
//! shape must stay readable, so the format is frozen.

pub mod cipher;
pub mod envelope;
pub mod key;

pub use cipher::{CipherError, CredentialCipher};
pub use key::{EncryptionKey, KEY_LEN};
