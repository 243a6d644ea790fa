//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Remote images are the
//! one thing the policy opens up, and only to the configured allowlist.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::images::ImageConfig;
use crate::state::AppState;

/// Render the Content-Security-Policy for the given image allowlist.
///
/// ```text
/// default-src 'self';
/// script-src 'self';
/// style-src 'self';
/// img-src 'self' data: <allowlist>;
/// connect-src 'self';
/// frame-src 'none';
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
#[must_use]
pub fn content_security_policy(images: &ImageConfig) -> String {
    let remote = images.csp_sources();
    let img_src = if remote.is_empty() {
        "'self' data:".to_string()
    } else {
        format!("'self' data: {remote}")
    };

    format!(
        "default-src 'self'; \
         script-src 'self'; \
         style-src 'self'; \
         img-src {img_src}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Policy served if the rendered one cannot be a header value. Identical to
/// [`content_security_policy`] with an empty allowlist.
const SELF_ONLY_POLICY: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data:; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Render the policy once as a header value.
///
/// Allowlist hostnames are restricted to `[a-z0-9.*-]` when parsed, so the
/// fallback only guards against that rule loosening.
#[must_use]
pub fn content_security_policy_header(images: &ImageConfig) -> HeaderValue {
    HeaderValue::from_str(&content_security_policy(images)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Content-Security-Policy is not a valid header, dropping remote images");
        HeaderValue::from_static(SELF_ONLY_POLICY)
    })
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: same-origin` - No referrer leakage to other sites
/// - `Content-Security-Policy` - See [`content_security_policy`]
/// - `Cache-Control: no-store` - Subscriber and billing data must not be cached
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));

    headers.insert(
        CONTENT_SECURITY_POLICY,
        state.content_security_policy().clone(),
    );

    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::images::RemotePattern;

    #[test]
    fn test_default_policy_allows_s3_images() {
        let csp = content_security_policy(&ImageConfig::default());
        assert!(csp.contains("img-src 'self' data: https://*.amazonaws.com;"));
        assert!(csp.starts_with("default-src 'self';"));
    }

    #[test]
    fn test_empty_allowlist() {
        let csp = content_security_policy(&ImageConfig::new(Vec::new()));
        assert!(csp.contains("img-src 'self' data:;"));
    }

    #[test]
    fn test_self_only_policy_matches_empty_allowlist() {
        assert_eq!(
            content_security_policy(&ImageConfig::new(Vec::new())),
            SELF_ONLY_POLICY
        );
    }

    #[test]
    fn test_header_carries_allowlist() {
        let images = ImageConfig::new(vec![
            RemotePattern::parse("https://*.amazonaws.com/**").unwrap(),
            RemotePattern::parse("https://media.example.net/avatars/*").unwrap(),
        ]);
        let header = content_security_policy_header(&images);
        assert_eq!(header.to_str().unwrap(), content_security_policy(&images));
        assert!(header.to_str().unwrap().contains("https://media.example.net"));
    }
}
