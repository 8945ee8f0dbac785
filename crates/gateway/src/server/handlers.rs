//! Axum request handlers for all service endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    ErrorResponse, HealthResponse, InboundMessage, SealRequest, SealResponse, WebhookResponse,
    WebhookStatus,
};
use common::{Provider, ServiceError};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::state::AppState;
use crate::credentials::{CredentialRecord, CredentialResolver};
use crate::directory::CustomerRecord;
use crate::phone;

/// `POST /webhook` — accept one inbound message.
///
/// The sender is normalized to a phone key first; an unusable sender stops
/// processing before any lookup. A registered customer has each stored
/// provider credential resolved independently. The response reports which
/// providers are usable and never carries secrets.
pub async fn webhook(State(state): State<AppState>, Json(msg): Json<InboundMessage>) -> Response {
    let span = info_span!("webhook", request_id = %Uuid::new_v4());
    let body = span.in_scope(|| process_message(&state, &msg));
    (StatusCode::OK, Json(body)).into_response()
}

/// `POST /credentials/seal` — encrypt a credential pair in the current storage layout.
///
/// Returns the `encrypted` envelope to persist as `{"encrypted": ...}` in the
/// provider's column.
pub async fn seal(State(state): State<AppState>, Json(req): Json<SealRequest>) -> Response {
    let Some(record) = CredentialRecord::new(req.client_id, req.client_secret) else {
        return error(&ServiceError::BadRequest(
            "client_id and client_secret must not be empty".into(),
        ));
    };

    match state.resolver.seal(&record) {
        Ok(stored) => (
            StatusCode::OK,
            Json(SealResponse {
                encrypted: stored.envelope().to_owned(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "credential sealing failed");
            error(&ServiceError::EncryptionFailure("credential sealing failed".into()))
        }
    }
}

/// `GET /health` — liveness check.
///
/// The key is validated before the server starts, so a running process is
/// always able to resolve credentials.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        customers_loaded: state.directory.customer_count(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalize, look up and resolve for one inbound message.
fn process_message(state: &AppState, msg: &InboundMessage) -> WebhookResponse {
    let Some(phone) = phone::normalize(&msg.from) else {
        info!("sender could not be normalized; message ignored");
        return WebhookResponse::short_circuit(WebhookStatus::InvalidSender);
    };

    let Some(customer) = state.directory.find_by_phone(&phone) else {
        info!("sender is not a registered customer");
        return WebhookResponse::short_circuit(WebhookStatus::Unregistered);
    };

    let resolved = resolve_credentials(&state.resolver, &customer);
    let providers_ready: Vec<Provider> = resolved.ready.keys().copied().collect();
    info!(
        customer_id = %customer.id,
        ready = providers_ready.len(),
        unavailable = resolved.unavailable.len(),
        "customer credentials resolved"
    );

    WebhookResponse {
        status: WebhookStatus::Ok,
        customer_id: Some(customer.id),
        providers_ready,
        providers_unavailable: resolved.unavailable,
    }
}

/// Per-customer resolution outcome handed to downstream order creation.
struct ResolvedCredentials {
    /// Providers with a complete credential pair.
    // Records are handed to order creation, which lives outside this service.
    #[cfg_attr(not(test), allow(dead_code))]
    ready: BTreeMap<Provider, CredentialRecord>,
    /// Providers whose stored value did not resolve.
    unavailable: Vec<Provider>,
}

/// Resolve every stored provider credential of `customer` independently.
fn resolve_credentials(resolver: &CredentialResolver, customer: &CustomerRecord) -> ResolvedCredentials {
    let mut ready = BTreeMap::new();
    let mut unavailable = Vec::new();
    for (&provider, raw) in &customer.credentials {
        if raw.is_null() {
            debug!(provider = %provider, customer_id = %customer.id, "no credential configured");
            continue;
        }
        match resolver.resolve(raw, provider, &customer.id) {
            Some(record) => {
                ready.insert(provider, record);
            }
            None => unavailable.push(provider),
        }
    }
    ResolvedCredentials { ready, unavailable }
}

fn error(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MockCustomerDirectory;
    use crate::server::state::testing::{empty_state, state_with, test_cipher};
    use axum::routing::{get, post};
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/webhook", post(webhook))
            .route("/credentials/seal", post(seal))
            .route("/health", get(health))
            .with_state(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn customer_with_credentials() -> CustomerRecord {
        let cipher = test_cipher();
        let wrapped = cipher
            .encrypt(r#"{"client_id":"AZ1","client_secret":"top-secret"}"#)
            .unwrap()
            .to_string();
        let legacy = cipher.encrypt("mp-id:mp-secret").unwrap().to_string();
        let mut credentials = BTreeMap::new();
        credentials.insert(Provider::Paypal, json!({ "encrypted": wrapped }));
        credentials.insert(Provider::MercadoPago, json!(legacy));
        credentials.insert(Provider::Stripe, json!(42));
        CustomerRecord {
            id: "cust-1".into(),
            display_name: Some("Tacos El Güero".into()),
            phone: phone::normalize("3311296199").unwrap(),
            credentials,
        }
    }

    #[tokio::test]
    async fn invalid_sender_skips_lookup() {
        let mut directory = MockCustomerDirectory::new();
        directory.expect_find_by_phone().never();
        let app = test_router(state_with(Arc::new(directory)));

        let (status, body) = post_json(app, "/webhook", json!({"from": "123", "text": "hola"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "invalid_sender");
    }

    #[tokio::test]
    async fn unregistered_sender() {
        let mut directory = MockCustomerDirectory::new();
        directory
            .expect_find_by_phone()
            .withf(|phone| phone.as_str() == "523311296199")
            .times(1)
            .returning(|_| None);
        let app = test_router(state_with(Arc::new(directory)));

        let (status, body) = post_json(app, "/webhook", json!({"from": "+52 1 331 129 6199"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unregistered");
        assert!(body.get("customer_id").is_none());
    }

    #[tokio::test]
    async fn registered_sender_reports_providers() {
        let customer = customer_with_credentials();
        let mut directory = MockCustomerDirectory::new();
        directory
            .expect_find_by_phone()
            .withf(|phone| phone.as_str() == "523311296199")
            .returning(move |_| Some(customer.clone()));
        let app = test_router(state_with(Arc::new(directory)));

        let (status, body) = post_json(app, "/webhook", json!({"from": "5213311296199"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["customer_id"], "cust-1");
        assert_eq!(body["providers_ready"], json!(["paypal", "mercadopago"]));
        assert_eq!(body["providers_unavailable"], json!(["stripe"]));

        let text = body.to_string();
        assert!(!text.contains("top-secret"));
        assert!(!text.contains("mp-secret"));
    }

    #[test]
    fn resolve_credentials_splits_ready_and_unavailable() {
        let resolver = CredentialResolver::new(test_cipher());
        let resolved = resolve_credentials(&resolver, &customer_with_credentials());
        assert_eq!(resolved.ready[&Provider::Paypal].identifier(), "AZ1");
        assert_eq!(resolved.ready[&Provider::MercadoPago].secret(), "mp-secret");
        assert_eq!(resolved.unavailable, vec![Provider::Stripe]);
    }

    #[test]
    fn null_column_is_not_configured() {
        let resolver = CredentialResolver::new(test_cipher());
        let mut customer = customer_with_credentials();
        customer.credentials.insert(Provider::Stripe, Value::Null);
        let resolved = resolve_credentials(&resolver, &customer);
        assert!(!resolved.ready.contains_key(&Provider::Stripe));
        assert!(resolved.unavailable.is_empty());
        assert_eq!(resolved.ready.len(), 2);
    }

    #[tokio::test]
    async fn seal_round_trips_through_resolver() {
        let state = empty_state();
        let resolver = state.resolver.clone();
        let (status, body) = post_json(
            test_router(state),
            "/credentials/seal",
            json!({"client_id": "AZ1", "client_secret": "EK9"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let stored = json!({ "encrypted": body["encrypted"] });
        let record = resolver.resolve(&stored, Provider::Paypal, "cust-1").unwrap();
        assert_eq!((record.identifier(), record.secret()), ("AZ1", "EK9"));
    }

    #[tokio::test]
    async fn seal_rejects_empty_secret() {
        let (status, body) = post_json(
            test_router(empty_state()),
            "/credentials/seal",
            json!({"client_id": "AZ1", "client_secret": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn health_reports_customer_count() {
        let mut directory = MockCustomerDirectory::new();
        directory.expect_customer_count().return_const(3usize);
        let app = test_router(state_with(Arc::new(directory)));

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["customers_loaded"], 3);
    }
}
