//! Portal session cookie.
//!
//! The session token is issued at login (outside this service) as the
//! `portal-token` cookie. Older portal builds scoped it to `/portal`, newer
//! ones to `/`, so every clear must cover both paths.

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};
use cookie::{Cookie, SameSite};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "portal-token";

/// Every path scope a session cookie may have been issued under.
pub const SESSION_COOKIE_PATHS: [&str; 2] = ["/", "/portal"];

/// Build a cookie that makes the browser drop the session at `path`.
///
/// The value is empty, `Max-Age` is zero, and `Expires` is in the past.
/// `secure` must match how the cookie was issued: browsers refuse to let a
/// non-secure cookie replace a secure one.
#[must_use]
pub fn removal_cookie(path: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path(path)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}

/// Append `Set-Cookie` headers clearing the session at every path scope.
pub fn append_session_removal(headers: &mut HeaderMap, secure: bool) {
    for path in SESSION_COOKIE_PATHS {
        let cookie = removal_cookie(path, secure);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, path, "Unencodable session cookie"),
        }
    }
}
