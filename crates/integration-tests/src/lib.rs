//! Integration tests for the ISP subscriber portal.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p isp-portal-integration-tests
//! ```
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`,
//! so no port is bound and no environment is read.
//!
//! # Test Categories
//!
//! - `portal_logout` - Session cookie expiry
//! - `admin_validation` - Admin record checks, body limits, response headers

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use isp_portal::config::PortalConfig;
use isp_portal::routes;
use isp_portal::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Build the portal router for `config`.
#[must_use]
pub fn app_with(config: PortalConfig) -> Router {
    routes::router(AppState::new(config))
}

/// Build the portal router with default configuration.
#[must_use]
pub fn app() -> Router {
    app_with(PortalConfig::default())
}

/// Send a POST with a raw JSON body.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST with a JSON value.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// Collect a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
