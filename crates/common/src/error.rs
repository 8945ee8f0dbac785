//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: missing fields, empty credential parts, or invalid JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Sealing a credential failed in the cipher layer.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::EncryptionFailure(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
        }
    }
}
