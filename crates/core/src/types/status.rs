//! Closed enumerations used by the admin schemas.
//!
//! Every enum serializes to its `SCREAMING_SNAKE_CASE` wire code, which is
//! also what [`ClosedEnum::from_code`] accepts. Codes are case-sensitive.

use serde::{Deserialize, Serialize};

/// A closed set of string codes.
///
/// Implemented by every enum declared with `define_enum!`. Validation uses
/// [`ClosedEnum::ALL`] to build "expected one of" messages.
pub trait ClosedEnum: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// The wire code for this variant.
    fn as_str(self) -> &'static str;

    /// Look up a variant by its exact wire code.
    #[must_use]
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == code)
    }
}

macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl ClosedEnum for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_enum! {
    /// Level of a location in the coverage hierarchy.
    LocationType {
        Region => "REGION",
        City => "CITY",
        /// Smallest unit; what most subscribers are attached to.
        Area => "AREA",
    }
}

impl Default for LocationType {
    fn default() -> Self {
        Self::Area
    }
}

define_enum! {
    /// Third-party payment processor a gateway record integrates with.
    GatewayProvider {
        Bkash => "BKASH",
        Nagad => "NAGAD",
        Rocket => "ROCKET",
        Sslcommerz => "SSLCOMMERZ",
        Aamarpay => "AAMARPAY",
        Shurjopay => "SHURJOPAY",
        Stripe => "STRIPE",
        Paypal => "PAYPAL",
    }
}

define_enum! {
    /// How a subscriber paid.
    PaymentMethod {
        Cash => "CASH",
        Bkash => "BKASH",
        Nagad => "NAGAD",
        Rocket => "ROCKET",
        BankTransfer => "BANK_TRANSFER",
        Card => "CARD",
        Online => "ONLINE",
    }
}

define_enum! {
    /// Settlement state of a recorded payment.
    PaymentStatus {
        Pending => "PENDING",
        /// Payments entered by staff are usually already settled.
        Completed => "COMPLETED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Completed
    }
}
