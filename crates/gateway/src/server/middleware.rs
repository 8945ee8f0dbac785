//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
///
/// Nothing on the request path performs network I/O, so this only guards
/// against pathological request bodies.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
