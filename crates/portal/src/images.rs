//! Remote image source allowlist.
//!
//! Patterns look like `https://*.amazonaws.com/**`:
//!
//! - In the hostname, `*` matches exactly one DNS label and `**` matches one
//!   or more.
//! - In the pathname, `*` matches one path segment and `**` matches any
//!   number of segments, including none.
//!
//! The allowlist also feeds the `img-src` directive of the
//! Content-Security-Policy (see [`crate::middleware::security_headers`]).

use std::fmt;

use thiserror::Error;
use url::Url;

use crate::config::DEFAULT_IMAGE_REMOTE_PATTERN;

/// Errors that can occur when parsing a [`RemotePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemotePatternError {
    #[error("pattern must start with http:// or https://: {0}")]
    UnsupportedProtocol(String),
    #[error("pattern has no hostname: {0}")]
    MissingHostname(String),
    #[error("pattern hostname contains invalid characters: {0}")]
    InvalidHostname(String),
}

/// A single allowed image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePattern {
    protocol: String,
    hostname: String,
    pathname: String,
}

impl RemotePattern {
    /// Parse a `protocol://hostname/pathname` pattern.
    ///
    /// A missing pathname means `/**`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-HTTP protocols or a missing/invalid hostname.
    pub fn parse(pattern: &str) -> Result<Self, RemotePatternError> {
        let (protocol, rest) = pattern
            .split_once("://")
            .filter(|(protocol, _)| matches!(*protocol, "http" | "https"))
            .ok_or_else(|| RemotePatternError::UnsupportedProtocol(pattern.to_owned()))?;

        let (hostname, pathname) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, "/**"),
        };

        if hostname.is_empty() {
            return Err(RemotePatternError::MissingHostname(pattern.to_owned()));
        }
        let valid_host = hostname
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '*'));
        if !valid_host {
            return Err(RemotePatternError::InvalidHostname(pattern.to_owned()));
        }

        Ok(Self {
            protocol: protocol.to_owned(),
            hostname: hostname.to_ascii_lowercase(),
            pathname: pathname.to_owned(),
        })
    }

    /// Whether `url` is covered by this pattern.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        if url.scheme() != self.protocol {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };

        let pattern_labels: Vec<&str> = self.hostname.split('.').collect();
        let host_labels: Vec<&str> = host.split('.').collect();
        if !glob(&pattern_labels, &host_labels, 1) {
            return false;
        }

        glob(&segments(&self.pathname), &segments(url.path()), 0)
    }

    /// CSP source expression for this pattern's origin, if CSP can express it.
    ///
    /// CSP only allows a wildcard as the leftmost label and that wildcard
    /// already spans several labels, so `**.` and `*.` both become `*.`.
    #[must_use]
    pub fn csp_source(&self) -> Option<String> {
        let host = self
            .hostname
            .strip_prefix("**.")
            .or_else(|| self.hostname.strip_prefix("*."))
            .map_or_else(|| self.hostname.clone(), |rest| format!("*.{rest}"));

        let rest = host.strip_prefix("*.").unwrap_or(&host);
        if rest.contains('*') {
            return None;
        }
        Some(format!("{}://{host}", self.protocol))
    }
}

impl fmt::Display for RemotePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.protocol, self.hostname, self.pathname)
    }
}

/// Allowlist of remote image sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    patterns: Vec<RemotePattern>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        let patterns = RemotePattern::parse(DEFAULT_IMAGE_REMOTE_PATTERN)
            .map(|p| vec![p])
            .unwrap_or_default();
        Self { patterns }
    }
}

impl ImageConfig {
    /// Build an allowlist from parsed patterns.
    #[must_use]
    pub const fn new(patterns: Vec<RemotePattern>) -> Self {
        Self { patterns }
    }

    /// The configured patterns.
    #[must_use]
    pub fn patterns(&self) -> &[RemotePattern] {
        &self.patterns
    }

    /// Whether `src` parses as a URL covered by any pattern.
    #[must_use]
    pub fn is_allowed(&self, src: &str) -> bool {
        Url::parse(src).is_ok_and(|url| self.patterns.iter().any(|p| p.matches(&url)))
    }

    /// Space-separated CSP sources for `img-src`.
    #[must_use]
    pub fn csp_sources(&self) -> String {
        self.patterns
            .iter()
            .filter_map(RemotePattern::csp_source)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Segment-wise glob. `**` consumes at least `double_star_min` segments.
fn glob(pattern: &[&str], input: &[&str], double_star_min: usize) -> bool {
    match pattern.split_first() {
        None => input.is_empty(),
        Some((&"**", rest)) => (double_star_min..=input.len())
            .any(|skip| input.get(skip..).is_some_and(|tail| glob(rest, tail, double_star_min))),
        Some((&"*", rest)) => input
            .split_first()
            .is_some_and(|(_, tail)| glob(rest, tail, double_star_min)),
        Some((literal, rest)) => input.split_first().is_some_and(|(head, tail)| {
            head.eq_ignore_ascii_case(literal) && glob(rest, tail, double_star_min)
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_default_pattern() {
        let config = ImageConfig::default();
        assert!(config.is_allowed("https://isp-media.amazonaws.com/avatars/42.png"));
        assert!(config.is_allowed("https://s3.amazonaws.com/"));
    }

    #[test]
    fn test_single_star_is_one_label() {
        let pattern = RemotePattern::parse("https://*.amazonaws.com/**").unwrap();
        assert!(!pattern.matches(&url("https://amazonaws.com/logo.png")));
        assert!(!pattern.matches(&url("https://bucket.s3.amazonaws.com/logo.png")));
    }

    #[test]
    fn test_double_star_host() {
        let pattern = RemotePattern::parse("https://**.amazonaws.com").unwrap();
        assert!(pattern.matches(&url("https://bucket.s3.amazonaws.com/logo.png")));
        assert!(!pattern.matches(&url("https://amazonaws.com/logo.png")));
    }

    #[test]
    fn test_protocol_must_match() {
        let config = ImageConfig::default();
        assert!(!config.is_allowed("http://isp-media.amazonaws.com/a.png"));
        assert!(!config.is_allowed("ftp://isp-media.amazonaws.com/a.png"));
        assert!(!config.is_allowed("not a url"));
    }

    #[test]
    fn test_other_domains_rejected() {
        let config = ImageConfig::default();
        assert!(!config.is_allowed("https://evil.example.com/a.png"));
        assert!(!config.is_allowed("https://amazonaws.com.evil.net/a.png"));
    }

    #[test]
    fn test_pathname_single_segment() {
        let pattern = RemotePattern::parse("https://cdn.example.net/avatars/*").unwrap();
        assert!(pattern.matches(&url("https://cdn.example.net/avatars/7.png")));
        assert!(!pattern.matches(&url("https://cdn.example.net/avatars/a/7.png")));
        assert!(!pattern.matches(&url("https://cdn.example.net/banners/7.png")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RemotePattern::parse("*.amazonaws.com"),
            Err(RemotePatternError::UnsupportedProtocol(_))
        ));
        assert!(matches!(
            RemotePattern::parse("https:///**"),
            Err(RemotePatternError::MissingHostname(_))
        ));
        assert!(matches!(
            RemotePattern::parse("https://bad host/**"),
            Err(RemotePatternError::InvalidHostname(_))
        ));
    }

    #[test]
    fn test_display_round_trips_input() {
        let pattern = RemotePattern::parse("https://*.amazonaws.com/**").unwrap();
        assert_eq!(pattern.to_string(), "https://*.amazonaws.com/**");
    }

    #[test]
    fn test_csp_sources() {
        let config = ImageConfig::new(vec![
            RemotePattern::parse("https://*.amazonaws.com/**").unwrap(),
            RemotePattern::parse("https://**.cloudfront.net").unwrap(),
            RemotePattern::parse("https://cdn.*.example.net").unwrap(),
        ]);
        assert_eq!(
            config.csp_sources(),
            "https://*.amazonaws.com https://*.cloudfront.net"
        );
    }
}
