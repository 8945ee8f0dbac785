//! Request and response types exchanged over the gateway's HTTP surface.
//!
//! None of these types ever carries a decrypted credential secret.

use serde::{Deserialize, Serialize};

use crate::Provider;

// ---------------------------------------------------------------------------
// Webhook endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /webhook`: one inbound message as delivered by the
/// messaging transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender identifier, free-form (`"+52 331 129 6199"`, `"5213311296199"`, ...).
    pub from: String,
    /// Message body. Passed through untouched; intent extraction happens elsewhere.
    #[serde(default)]
    pub text: Option<String>,
}

/// Outcome of processing an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    /// Customer found; credential readiness is reported per provider.
    Ok,
    /// The sender could not be normalized to a phone key; no lookup was attempted.
    InvalidSender,
    /// The sender normalized but no customer is registered under that key.
    Unregistered,
}

/// Response body for `POST /webhook`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Processing outcome.
    pub status: WebhookStatus,
    /// Identifier of the matched customer, when one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Providers whose stored credentials resolved to a complete pair.
    #[serde(default)]
    pub providers_ready: Vec<Provider>,
    /// Providers with a stored value that could not be resolved.
    #[serde(default)]
    pub providers_unavailable: Vec<Provider>,
}

impl WebhookResponse {
    /// A response for a message that stopped before credential resolution.
    pub fn short_circuit(status: WebhookStatus) -> Self {
        Self {
            status,
            customer_id: None,
            providers_ready: Vec::new(),
            providers_unavailable: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Credential sealing endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /credentials/seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealRequest {
    /// Public client identifier issued by the provider.
    pub client_id: String,
    /// Client secret issued by the provider.
    pub client_secret: String,
}

/// Response body for `POST /credentials/seal`: the value to persist in the
/// provider's credential column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// `<hex iv>:<hex ciphertext>` envelope over the structured credential.
    pub encrypted: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"`.
    pub status: String,
    /// Number of customer records currently loaded in the directory.
    pub customers_loaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_message_text_is_optional() {
        let msg: InboundMessage = serde_json::from_value(json!({"from": "+52 331 129 6199"})).unwrap();
        assert_eq!(msg.from, "+52 331 129 6199");
        assert!(msg.text.is_none());
    }

    #[test]
    fn short_circuit_omits_customer() {
        let resp = WebhookResponse::short_circuit(WebhookStatus::InvalidSender);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["status"], "invalid_sender");
        assert!(value.get("customer_id").is_none());
        assert_eq!(value["providers_ready"], json!([]));
    }

    #[test]
    fn ok_response_lists_providers() {
        let resp = WebhookResponse {
            status: WebhookStatus::Ok,
            customer_id: Some("cust-1".into()),
            providers_ready: vec![Provider::Paypal],
            providers_unavailable: vec![Provider::Stripe],
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["providers_ready"], json!(["paypal"]));
        assert_eq!(value["providers_unavailable"], json!(["stripe"]));
    }

    #[test]
    fn error_response_from_service_error() {
        let err = crate::ServiceError::BadRequest("client_id must not be empty".into());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "bad_request");
        assert!(body.message.contains("client_id"));
    }
}
