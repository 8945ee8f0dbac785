//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::credentials::CredentialResolver;
use crate::directory::CustomerDirectory;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Customer lookup by canonical phone key.
    pub directory: Arc<dyn CustomerDirectory>,
    /// Credential resolver holding the process-wide key.
    pub resolver: CredentialResolver,
}

impl AppState {
    /// Create a new [`AppState`] from a directory and a resolver.
    pub fn new(directory: Arc<dyn CustomerDirectory>, resolver: CredentialResolver) -> Self {
        Self {
            directory,
            resolver,
        }
    }
}
