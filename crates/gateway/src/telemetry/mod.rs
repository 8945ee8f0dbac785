//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No key material, credential secrets, envelopes or decrypted payloads**
//!   may appear in any log field. Keys are described by length only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by `RUST_LOG`.

pub mod init;

pub use init::init_telemetry;
