//! [`StoredCredentialValue`]: the two shapes a credential column may hold.

use serde::{Deserialize, Serialize};

use super::resolver::ResolveError;

/// A persisted provider credential, classified once at the storage boundary.
///
/// Serialises to exactly the JSON the column holds: a bare string for
/// [`Plain`](Self::Plain), `{"encrypted": "..."}` for [`Wrapped`](Self::Wrapped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCredentialValue {
    /// Legacy shape: the envelope string itself.
    Plain(String),
    /// Current shape: an object whose `encrypted` field holds the envelope.
    Wrapped {
        /// `iv:ciphertext` envelope.
        encrypted: String,
    },
}

impl StoredCredentialValue {
    /// Classify a raw column value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnrecognizedCredentialShape`] for anything other
    /// than a non-empty string or an object with a non-empty `encrypted` string.
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, ResolveError> {
        let stored = Self::deserialize(raw).map_err(|_| ResolveError::UnrecognizedCredentialShape)?;
        if stored.envelope().is_empty() {
            return Err(ResolveError::UnrecognizedCredentialShape);
        }
        Ok(stored)
    }

    /// The envelope string regardless of shape.
    pub fn envelope(&self) -> &str {
        match self {
            Self::Plain(envelope) => envelope,
            Self::Wrapped { encrypted } => encrypted,
        }
    }

    /// Short label for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain",
            Self::Wrapped { .. } => "wrapped",
        }
    }
}
