//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (reuse or generate, echo in response)
//! 4. Security headers (CSP built from the image allowlist, etc.)
//!
//! Body-size limits are applied per route group in [`crate::routes`].

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, SESSION_COOKIE_PATHS, append_session_removal};
