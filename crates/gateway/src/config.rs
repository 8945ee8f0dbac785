//! Configuration loading and validation for the gateway service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.
//! In particular there is no fallback key: without `ENCRYPTION_KEY` the service
//! refuses to start.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::EncryptionKey;

/// Validated gateway configuration.
///
/// `Debug` output is safe to log: the key prints as `[REDACTED]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// 256-bit credential encryption key, hex-encoded. **Required.**
    pub encryption_key: EncryptionKey,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Path to a JSON array of customer records used to seed the directory.
    #[serde(default)]
    pub customers_file: Option<String>,

    /// How often (seconds) to reload the customers file.
    #[serde(default = "default_customers_refresh_interval")]
    pub customers_refresh_interval_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_customers_refresh_interval() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed,
    /// including an encryption key that is not exactly 32 hex-encoded bytes.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is ENCRYPTION_KEY set to 64 hex characters?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.customers_refresh_interval_secs == 0 {
            anyhow::bail!("CUSTOMERS_REFRESH_INTERVAL_SECS must be > 0");
        }
        if let Some(path) = &self.customers_file {
            if path.trim().is_empty() {
                anyhow::bail!("CUSTOMERS_FILE must not be empty when set");
            }
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
