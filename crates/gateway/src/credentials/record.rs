//! [`CredentialRecord`]: the only credential shape business logic may consume.

use serde::{Deserialize, Serialize};

/// A resolved `(identifier, secret)` pair, both non-empty.
///
/// Built fresh per lookup; never cached and never written back.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    identifier: String,
    secret: String,
}

impl CredentialRecord {
    /// Build a record, returning `None` if either part is empty.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let identifier = identifier.into();
        let secret = secret.into();
        if identifier.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self { identifier, secret })
    }

    /// Public identifier (client id / publishable key).
    // Read by the order-creation client, which lives outside this service.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Secret half of the pair.
    // Read by the order-creation client, which lives outside this service.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Serialise into the structured plaintext the current writer produces.
    ///
    /// # Errors
    ///
    /// Propagates the [`serde_json::Error`] from serialisation.
    pub fn to_structured_json(&self) -> Result<String, serde_json::Error> {
        let wire = StructuredCredential {
            client_id: self.identifier.clone(),
            client_secret: self.secret.clone(),
        };
        serde_json::to_string(&wire)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Structured plaintext layout inside an envelope.
///
/// Older writers used camelCase keys; both spellings are read.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StructuredCredential {
    #[serde(alias = "clientId")]
    pub client_id: String,
    #[serde(alias = "clientSecret")]
    pub client_secret: String,
}
