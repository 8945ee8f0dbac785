//! [`CredentialResolver`]: raw column value in, complete credential pair (or nothing) out.

use std::sync::Arc;

use common::Provider;
use thiserror::Error;
use tracing::{debug, warn};

use super::format::{default_formats, ContentFormat};
use super::record::CredentialRecord;
use super::stored::StoredCredentialValue;
use crate::crypto::{CipherError, CredentialCipher};

/// Why a stored credential could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither an envelope string nor an `{"encrypted": ...}` object.
    #[error("unrecognized credential shape")]
    UnrecognizedCredentialShape,

    /// The envelope was malformed or did not decrypt.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Decrypted, but no content format accepted the plaintext.
    #[error("decrypted credential content is neither structured nor delimited")]
    UnparsableCredentialContent,
}

impl ResolveError {
    /// Stable label for the failure point, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnrecognizedCredentialShape => "unrecognized_shape",
            Self::Cipher(CipherError::MalformedEnvelope) => "malformed_envelope",
            Self::Cipher(_) => "decryption_failed",
            Self::UnparsableCredentialContent => "unparsable_content",
        }
    }
}

/// Why a credential could not be sealed for storage.
#[derive(Debug, Error)]
pub enum SealError {
    /// The structured plaintext could not be serialised.
    #[error("credential serialisation failed: {0}")]
    Serialise(#[from] serde_json::Error),

    /// The cipher rejected the payload.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Resolves stored provider credentials into [`CredentialRecord`]s.
///
/// Reads every historical layout; writes only the current one (see [`seal`](Self::seal)).
#[derive(Clone)]
pub struct CredentialResolver {
    cipher: CredentialCipher,
    formats: Arc<[Arc<dyn ContentFormat>]>,
}

impl CredentialResolver {
    /// Create a resolver using the default content-format chain.
    pub fn new(cipher: CredentialCipher) -> Self {
        Self::with_formats(cipher, default_formats())
    }

    /// Create a resolver with an explicit, ordered content-format chain.
    pub fn with_formats(cipher: CredentialCipher, formats: Vec<Arc<dyn ContentFormat>>) -> Self {
        Self {
            cipher,
            formats: formats.into(),
        }
    }

    /// Resolve a raw column value for `provider` belonging to `subject_id`.
    ///
    /// Failures are logged with their kind and collapse to `None`.
    pub fn resolve(
        &self,
        raw: &serde_json::Value,
        provider: Provider,
        subject_id: &str,
    ) -> Option<CredentialRecord> {
        let result = StoredCredentialValue::from_json(raw).and_then(|stored| self.try_resolve(&stored));
        report(result, provider, subject_id)
    }

    /// Decrypt and parse `stored`, keeping the failure reason.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Cipher`] when decryption fails and
    /// [`ResolveError::UnparsableCredentialContent`] when no format matches.
    pub fn try_resolve(&self, stored: &StoredCredentialValue) -> Result<CredentialRecord, ResolveError> {
        let plaintext = self.cipher.decrypt(stored.envelope())?;

        for format in self.formats.iter() {
            if let Some(record) = format.parse(&plaintext) {
                debug!(shape = stored.shape(), format = format.name(), "credential content parsed");
                return Ok(record);
            }
        }
        Err(ResolveError::UnparsableCredentialContent)
    }

    /// Encrypt `record` in the current storage layout: structured JSON content
    /// inside the wrapped shape.
    ///
    /// # Errors
    ///
    /// Returns [`SealError`] if serialisation or encryption fails; nothing is
    /// produced that could not later be resolved.
    pub fn seal(&self, record: &CredentialRecord) -> Result<StoredCredentialValue, SealError> {
        let plaintext = record.to_structured_json()?;
        let envelope = self.cipher.encrypt(&plaintext)?;
        Ok(StoredCredentialValue::Wrapped {
            encrypted: envelope.to_string(),
        })
    }
}

/// Log a resolution failure and collapse the result to an `Option`.
fn report(
    result: Result<CredentialRecord, ResolveError>,
    provider: Provider,
    subject_id: &str,
) -> Option<CredentialRecord> {
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(
                provider = %provider,
                subject_id,
                kind = e.kind(),
                error = %e,
                "credential could not be resolved"
            );
            None
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.formats.iter().map(|format| format.name()).collect();
        f.debug_struct("CredentialResolver")
            .field("cipher", &self.cipher)
            .field("formats", &names)
            .finish()
    }
}
