//! Input validation schemas for admin mutations.
//!
//! Each schema turns an untyped JSON record into a typed, normalized value or
//! a [`ValidationError`] listing every violated constraint. Nothing here
//! performs I/O; referential checks (does this parent location exist, does
//! this invoice belong to this subscriber) belong to persistence.
//!
//! # Schemas
//!
//! | Record | Create | Update |
//! |---|---|---|
//! | Location | [`NewLocation`] | [`LocationUpdate`] |
//! | Payment gateway | [`NewPaymentGateway`] | [`PaymentGatewayUpdate`] |
//! | Payment | [`NewPayment`] | [`PaymentUpdate`] |
//!
//! Create schemas require their mandatory fields and fill defaults. Update
//! schemas accept any subset of fields and never fill defaults, so an absent
//! key always means "leave unchanged".
//!
//! # Example
//!
//! ```
//! use isp_portal_core::validation::{NewLocation, Schema};
//! use isp_portal_core::LocationType;
//! use serde_json::json;
//!
//! let location = NewLocation::parse(&json!({ "name": "Mirpur" })).unwrap();
//! assert_eq!(location.kind, LocationType::Area);
//!
//! let err = NewLocation::parse(&json!({ "name": "M" })).unwrap_err();
//! assert_eq!(err.issues()[0].path, "name");
//! assert_eq!(err.issues()[0].message, "Location name must be at least 2 characters");
//! ```

mod fields;
pub mod location;
pub mod payment;
pub mod payment_gateway;

use serde::Serialize;
use serde_json::Value;

pub use location::{LocationUpdate, NewLocation};
pub use payment::{NewPayment, PaymentUpdate};
pub use payment_gateway::{NewPaymentGateway, PaymentGatewayUpdate};

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Key of the offending field, or `""` when the record itself is wrong.
    pub path: String,
    /// Human-readable message, suitable for showing next to a form field.
    pub message: String,
}

impl Issue {
    /// Create an issue for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validation failure carrying one or more issues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input ({} issue(s))", .issues.len())]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    /// Build an error from a non-empty issue list.
    #[must_use]
    pub const fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Issues in field declaration order.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns the first message reported for `path`, if any.
    #[must_use]
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.path == path)
            .map(|issue| issue.message.as_str())
    }
}

/// Parse-or-reject entry point shared by every schema.
pub trait Schema: Sized {
    /// Validate `input` and produce the typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated constraint.
    fn parse(input: &Value) -> Result<Self, ValidationError>;
}
