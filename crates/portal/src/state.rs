//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::config::PortalConfig;
use crate::middleware::security_headers::content_security_policy_header;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds only read-only
/// configuration; handlers never share mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    csp: HeaderValue,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Content-Security-Policy is rendered once here since the image
    /// allowlist cannot change while the process runs.
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        let csp = content_security_policy_header(&config.images);

        Self {
            inner: Arc::new(AppStateInner { config, csp }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get the rendered Content-Security-Policy header value.
    #[must_use]
    pub fn content_security_policy(&self) -> &HeaderValue {
        &self.inner.csp
    }
}
