//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use isp_portal_core::{Issue, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed schema validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request body was not valid JSON.
    #[error("Malformed body: {0}")]
    MalformedBody(#[from] JsonRejection),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body for a rejected validation.
#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    valid: bool,
    issues: &'a [Issue],
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => {
                tracing::debug!(issues = err.issues().len(), "Validation rejected input");
                let body = ValidationBody {
                    valid: false,
                    issues: err.issues(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            // Axum already picks the right status (400, 413, 415, 422).
            Self::MalformedBody(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                rejection.into_response()
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                // Don't expose internal error details to clients
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the subscriber.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
