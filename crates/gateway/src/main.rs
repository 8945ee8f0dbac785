//! `gateway` — messaging webhook gateway entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables (fails without a valid key).
//! 2. Initialise structured JSON logging.
//! 3. Build the credential cipher and resolver from the injected key.
//! 4. Seed the customer directory and spawn its refresh task.
//! 5. Build the Axum router and start the HTTP server.

mod config;
mod credentials;
mod crypto;
mod directory;
mod phone;
mod server;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use config::Config;
use credentials::CredentialResolver;
use crypto::{CredentialCipher, KEY_LEN};
use directory::InMemoryDirectory;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "gateway starting"
    );

    // -----------------------------------------------------------------------
    // 3. Credential cipher
    // -----------------------------------------------------------------------
    let resolver = CredentialResolver::new(CredentialCipher::new(cfg.encryption_key.clone()));
    info!(key_len = KEY_LEN, "encryption key loaded");

    // -----------------------------------------------------------------------
    // 4. Customer directory
    // -----------------------------------------------------------------------
    let directory = InMemoryDirectory::new();
    let _customer_refresh = match &cfg.customers_file {
        Some(path) => {
            let path = PathBuf::from(path);
            directory::load_from_file(&path, &directory).await?;
            Some(directory::refresh_task(
                path,
                Duration::from_secs(cfg.customers_refresh_interval_secs),
                directory.clone(),
            ))
        }
        None => {
            warn!("CUSTOMERS_FILE not set; every sender will be reported as unregistered");
            None
        }
    };

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(Arc::new(directory), resolver);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
