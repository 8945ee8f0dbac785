//! Decrypted-content formats, tried in order until one yields a record.
//!
//! Three generations of writers left two plaintext layouts behind. The current
//! writer only ever produces [`StructuredJson`]; [`LegacyDelimited`] exists so
//! older rows stay readable without a rewrite.

use std::sync::Arc;

use super::record::{CredentialRecord, StructuredCredential};

/// One way of reading a decrypted credential payload.
pub trait ContentFormat: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Parse `plaintext` into a complete record, or `None` if it is not this format.
    fn parse(&self, plaintext: &str) -> Option<CredentialRecord>;
}

/// `{"client_id": "...", "client_secret": "..."}` (camelCase keys also accepted).
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredJson;

impl ContentFormat for StructuredJson {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn parse(&self, plaintext: &str) -> Option<CredentialRecord> {
        let wire: StructuredCredential = serde_json::from_str(plaintext).ok()?;
        CredentialRecord::new(wire.client_id, wire.client_secret)
    }
}

/// `identifier:secret` with exactly one colon and both halves non-empty.
///
/// Deliberately narrow: anything else is rejected rather than guessed at.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDelimited;

impl LegacyDelimited {
    /// Recover a record from a colon-delimited pair.
    pub fn from_delimited(text: &str) -> Option<CredentialRecord> {
        let mut parts = text.split(':');
        let (identifier, secret) = (parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        CredentialRecord::new(identifier, secret)
    }
}

impl ContentFormat for LegacyDelimited {
    fn name(&self) -> &'static str {
        "legacy_delimited"
    }

    /// Plaintext that is valid JSON belongs to the structured format; if that
    /// format rejected it, splitting it on colons would only yield JSON fragments.
    fn parse(&self, plaintext: &str) -> Option<CredentialRecord> {
        if serde_json::from_str::<serde_json::Value>(plaintext).is_ok() {
            return None;
        }
        Self::from_delimited(plaintext)
    }
}

/// Formats in precedence order: structured wins over legacy.
pub fn default_formats() -> Vec<Arc<dyn ContentFormat>> {
    vec![Arc::new(StructuredJson), Arc::new(LegacyDelimited)]
}
