//! Provider credential resolution.
//!
//! # Pipeline
//!
//! 1. The raw column value is classified once into a [`StoredCredentialValue`](stored::StoredCredentialValue)
//!    (`Plain` envelope string or `Wrapped { encrypted }` object).
//! 2. The envelope is decrypted with the injected [`CredentialCipher`].
//! 3. The plaintext is handed to an ordered chain of [`ContentFormat`](format::ContentFormat)s:
//!    structured JSON first, the colon-delimited legacy form second.
//!
//! Every failure point is logged on its own; callers only ever see a complete
//! [`CredentialRecord`] or nothing.
//!
//! [`CredentialCipher`]: crate::crypto::CredentialCipher

pub mod format;
pub mod record;
pub mod resolver;
pub mod stored;

pub use record::CredentialRecord;
pub use resolver::CredentialResolver;
