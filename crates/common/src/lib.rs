//! Common types, protocol definitions, and errors shared across the payment webhook gateway crates.

pub mod error;
pub mod protocol;
pub mod provider;

pub use error::ServiceError;
pub use provider::Provider;
