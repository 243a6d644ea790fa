//! Correlation IDs for portal requests.
//!
//! The portal sits behind the operator's reverse proxy, which usually stamps
//! `x-request-id`. That value is kept so proxy logs, portal logs, and Sentry
//! events line up; a fresh UUID v4 stands in when it is missing or unusable.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID we will echo back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the ID for this request: the proxy's, if it is short printable
/// ASCII, else a new UUID.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

/// Tag the request span and Sentry scope, then echo the ID on the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn test_proxy_id_is_kept() {
        assert_eq!(resolve_request_id(&headers_with("cf-7f3a9b")), "cf-7f3a9b");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let id = resolve_request_id(&HeaderMap::new());
        assert!(Uuid::try_parse(&id).is_ok());
    }

    #[test]
    fn test_oversized_or_spaced_id_is_replaced() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert!(Uuid::try_parse(&resolve_request_id(&headers_with(&long))).is_ok());
        assert!(Uuid::try_parse(&resolve_request_id(&headers_with("two words"))).is_ok());
    }
}
