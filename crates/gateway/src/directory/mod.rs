//! Customer lookup by canonical phone key.
//!
//! The production store is a pooled relational database owned by another
//! service; this module defines the lookup contract the gateway needs and an
//! in-memory implementation seeded from a JSON file.
//!
//! # Module invariants
//!
//! - **Lookups take a [`PhoneKey`] only.** No raw sender text ever reaches a directory.
//! - Credential column values are carried through untouched; resolving them is
//!   the caller's job.

pub mod memory;

pub use memory::InMemoryDirectory;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use common::Provider;
use serde::{Deserialize, Serialize};
use tokio::time;
use tracing::{info, warn};

use crate::phone::PhoneKey;

/// A registered customer as stored, with credential columns still encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Stable customer identifier.
    pub id: String,
    /// Business name shown in replies.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Canonical phone key (normalized on read).
    pub phone: PhoneKey,
    /// Raw credential column values keyed by provider.
    ///
    /// Columns for providers this service does not know are dropped on read
    /// instead of rejecting the whole customer.
    #[serde(default, deserialize_with = "known_providers")]
    pub credentials: BTreeMap<Provider, serde_json::Value>,
}

fn known_providers<'de, D>(deserializer: D) -> Result<BTreeMap<Provider, serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let columns = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut known = BTreeMap::new();
    for (label, value) in columns {
        match Provider::from_label(&label) {
            Some(provider) => {
                known.insert(provider, value);
            }
            None => warn!(column = %label, "ignoring credential column for unknown provider"),
        }
    }
    Ok(known)
}

/// Read-only customer lookup.
#[cfg_attr(test, mockall::automock)]
pub trait CustomerDirectory: Send + Sync {
    /// Find the customer registered under `phone`.
    fn find_by_phone(&self, phone: &PhoneKey) -> Option<CustomerRecord>;

    /// Number of customers currently known.
    fn customer_count(&self) -> usize;
}

/// Read a JSON array of customer records from `path` and atomically replace
/// the directory contents.
///
/// Rows that fail to deserialize (for example a phone that does not normalize)
/// are skipped with a warning; the rest are loaded.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub async fn load_from_file(path: &Path, directory: &InMemoryDirectory) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read customers file {}", path.display()))?;

    let rows: Vec<serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("customers file {} is not a JSON array", path.display()))?;

    let mut customers = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<CustomerRecord>(row) {
            Ok(customer) => customers.push(customer),
            Err(e) => warn!(index, error = %e, "skipping invalid customer row"),
        }
    }

    directory.replace_all(customers);
    info!(count = directory.customer_count(), "customer directory loaded");
    Ok(())
}

/// Spawn a background task that periodically reloads the directory from `path`.
///
/// On reload failure the previous contents are retained and a warning is emitted.
pub fn refresh_task(
    path: PathBuf,
    interval: Duration,
    directory: InMemoryDirectory,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        // First tick fires immediately — skip it so we don't double-load at startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = load_from_file(&path, &directory).await {
                warn!(error = %e, "customer reload failed; retaining previous directory");
            }
        }
    })
}
