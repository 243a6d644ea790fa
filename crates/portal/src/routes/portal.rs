//! Subscriber portal route handlers.

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use serde::Serialize;

use crate::error::clear_sentry_user;
use crate::middleware::append_session_removal;
use crate::state::AppState;

/// Logout response body.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Log the subscriber out by expiring the session cookie.
///
/// Clears `portal-token` at every path it may have been issued under. There
/// is no server-side session to destroy, so this always succeeds, including
/// when no cookie was sent.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    append_session_removal(&mut headers, state.config().is_secure());

    clear_sentry_user();
    tracing::info!("Subscriber logged out");

    (headers, Json(LogoutResponse { success: true }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    use super::*;
    use crate::config::PortalConfig;

    #[tokio::test]
    async fn test_logout_clears_both_paths() {
        let state = AppState::new(PortalConfig::default());
        let response = logout(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
        assert!(cookies.iter().all(|c| !c.contains("Secure")));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"success":true}"#);
    }

    #[tokio::test]
    async fn test_logout_over_https_sets_secure() {
        let config = PortalConfig {
            base_url: "https://portal.example.net".to_string(),
            ..PortalConfig::default()
        };
        let response = logout(State(AppState::new(config))).await.into_response();

        assert!(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .all(|v| v.to_str().unwrap().contains("Secure"))
        );
    }
}
