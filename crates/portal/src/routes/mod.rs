//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                      - Health check
//!
//! # Subscriber portal
//! POST /api/portal/logout                           - Expire the session cookie
//!
//! # Admin validation (body-limited)
//! POST /api/admin/locations/validate                - Check a new location
//! POST /api/admin/locations/{id}/validate           - Check location changes
//! POST /api/admin/payment-gateways/validate         - Check a new gateway
//! POST /api/admin/payment-gateways/{id}/validate    - Check gateway changes
//! POST /api/admin/payments/validate                 - Check a new payment
//! POST /api/admin/payments/{id}/validate            - Check payment changes
//! ```

pub mod admin;
pub mod portal;

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the subscriber portal API router.
pub fn portal_routes() -> Router<AppState> {
    Router::new().route("/logout", post(portal::logout))
}

/// Create the admin validation API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/locations/validate", post(admin::validate_new_location))
        .route(
            "/locations/{id}/validate",
            post(admin::validate_location_update),
        )
        .route(
            "/payment-gateways/validate",
            post(admin::validate_new_payment_gateway),
        )
        .route(
            "/payment-gateways/{id}/validate",
            post(admin::validate_payment_gateway_update),
        )
        .route("/payments/validate", post(admin::validate_new_payment))
        .route(
            "/payments/{id}/validate",
            post(admin::validate_payment_update),
        )
}

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary since they need an initialized
/// client; everything else lives here so tests exercise the real stack.
pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config().action_body_limit.bytes());

    Router::new()
        .route("/health", get(health))
        .nest("/api/portal", portal_routes())
        .nest("/api/admin", admin_routes().layer(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. There are no dependencies to check.
async fn health() -> &'static str {
    "ok"
}
