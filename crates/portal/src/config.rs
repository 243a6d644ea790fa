//! Portal configuration loaded from environment variables.
//!
//! Everything here is read once at startup and shared read-only through
//! [`AppState`](crate::state::AppState).
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL (default: <http://localhost:3000>).
//!   An `https` URL marks cookies `Secure`.
//! - `PORTAL_IMAGE_REMOTE_PATTERNS` - Comma-separated allowlist of remote
//!   image sources (default: `https://*.amazonaws.com/**`)
//! - `PORTAL_ACTION_BODY_LIMIT` - Largest accepted body for mutating actions
//!   (default: `2mb`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::images::{ImageConfig, RemotePattern};

/// Default allowlist for remote images (tenant uploads live in S3).
pub const DEFAULT_IMAGE_REMOTE_PATTERN: &str = "https://*.amazonaws.com/**";

/// Default body-size ceiling for mutating actions.
pub const DEFAULT_ACTION_BODY_LIMIT: ByteSize = ByteSize::mib(2);

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Remote image allowlist
    pub images: ImageConfig,
    /// Maximum request body accepted by mutating routes
    pub action_body_limit: ByteSize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            images: ImageConfig::default(),
            action_body_limit: DEFAULT_ACTION_BODY_LIMIT,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_var(&lookup, "PORTAL_HOST")?.unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORTAL_PORT")?.unwrap_or(defaults.port);
        let base_url = match lookup("PORTAL_BASE_URL") {
            Some(raw) => {
                let url = Url::parse(raw.trim()).map_err(|e| invalid("PORTAL_BASE_URL", e))?;
                url.as_str().trim_end_matches('/').to_string()
            }
            None => defaults.base_url,
        };
        let action_body_limit =
            parse_var(&lookup, "PORTAL_ACTION_BODY_LIMIT")?.unwrap_or(defaults.action_body_limit);

        let images = match lookup("PORTAL_IMAGE_REMOTE_PATTERNS") {
            Some(raw) => ImageConfig::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(RemotePattern::parse)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| invalid("PORTAL_IMAGE_REMOTE_PATTERNS", e))?,
            ),
            None => defaults.images,
        };

        Ok(Self {
            host,
            port,
            base_url,
            images,
            action_body_limit,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the portal is served over HTTPS (cookies get `Secure`).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Byte sizes
// =============================================================================

/// Errors that can occur when parsing a [`ByteSize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteSizeError {
    #[error("size is empty")]
    Empty,
    #[error("invalid size number: {0}")]
    InvalidNumber(String),
    #[error("unknown size unit: {0}")]
    UnknownUnit(String),
    #[error("size overflows")]
    Overflow,
}

/// A size in bytes, written as e.g. `2mb`, `512kb`, or `1048576`.
///
/// Units are 1024-based and case-insensitive: `b`, `kb`, `mb`, `gb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(usize);

impl ByteSize {
    /// Size in mebibytes.
    #[must_use]
    pub const fn mib(n: usize) -> Self {
        Self(n * 1024 * 1024)
    }

    /// Size in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = ByteSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ByteSizeError::Empty);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let number: usize = number
            .parse()
            .map_err(|_| ByteSizeError::InvalidNumber(s.to_owned()))?;

        let multiplier: usize = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "kb" => 1024,
            "mb" => 1024 * 1024,
            "gb" => 1024 * 1024 * 1024,
            other => return Err(ByteSizeError::UnknownUnit(other.to_owned())),
        };

        number
            .checked_mul(multiplier)
            .map(Self)
            .ok_or(ByteSizeError::Overflow)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KIB: usize = 1024;
        const MIB: usize = 1024 * KIB;
        match self.0 {
            n if n >= MIB && n % MIB == 0 => write!(f, "{}mb", n / MIB),
            n if n >= KIB && n % KIB == 0 => write!(f, "{}kb", n / KIB),
            n => write!(f, "{n}b"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

/// Parse an optional variable; unset means `None`, set-but-bad is an error.
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| invalid(key, e)))
        .transpose()
}
