//! Strictly positive monetary amounts using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PositiveAmount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input could not be read as a number.
    #[error("amount is not a number: {0}")]
    NotANumber(String),
    /// The value is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// The value is positive but too large, or too finely divided, for a
    /// 96-bit decimal with at most 28 fractional digits.
    #[error("amount is out of range: {0}")]
    OutOfRange(String),
}

/// A monetary amount that is always greater than zero.
///
/// Amounts are currency-less; the portal bills in a single currency.
///
/// ## Coercion
///
/// Form posts send amounts as strings, API clients as numbers. Both go
/// through [`PositiveAmount::coerce_str`]:
///
/// ```
/// use isp_portal_core::PositiveAmount;
///
/// assert!(PositiveAmount::coerce_str(" 499.50 ").is_ok());
/// assert!(PositiveAmount::coerce_str("1e3").is_ok());
///
/// assert!(PositiveAmount::coerce_str("0").is_err());   // not positive
/// assert!(PositiveAmount::coerce_str("").is_err());    // empty coerces to zero
/// assert!(PositiveAmount::coerce_str("abc").is_err()); // not a number
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PositiveAmount(Decimal);

impl PositiveAmount {
    /// Wrap a decimal, rejecting zero and negatives.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] if `value <= 0`.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value > Decimal::ZERO {
            Ok(Self(value.normalize()))
        } else {
            Err(AmountError::NotPositive)
        }
    }

    /// Coerce a textual amount.
    ///
    /// Surrounding whitespace is ignored and an empty string reads as zero.
    /// Plain decimal and scientific notation are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not numeric, not positive, or a
    /// positive number that does not fit a [`Decimal`].
    pub fn coerce_str(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Self::new(Decimal::ZERO);
        }

        match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            // Digits past the 28th decimal place round away; a positive
            // literal must not round down to zero.
            Ok(value) if value.is_zero() && is_positive_literal(trimmed) => {
                Err(AmountError::OutOfRange(trimmed.to_owned()))
            }
            Ok(value) => Self::new(value),
            Err(_) => Err(unrepresentable(trimmed)),
        }
    }

    /// Coerce a JSON number.
    ///
    /// # Errors
    ///
    /// Returns an error if the number does not fit a decimal or is not positive.
    pub fn coerce_number(n: &serde_json::Number) -> Result<Self, AmountError> {
        Self::coerce_str(&n.to_string())
    }

    /// Returns the amount as a decimal.
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }
}

/// Classify numeric text that `Decimal` refused to parse.
fn unrepresentable(literal: &str) -> AmountError {
    match parse_literal(literal) {
        Some(f) if f > 0.0 => AmountError::OutOfRange(literal.to_owned()),
        Some(_) => AmountError::NotPositive,
        None => AmountError::NotANumber(literal.to_owned()),
    }
}

fn is_positive_literal(literal: &str) -> bool {
    parse_literal(literal).is_some_and(|f| f > 0.0)
}

/// Read plain or scientific notation as `f64`, refusing `inf` and `NaN`
/// spellings. Overflow to infinity still keeps its sign.
fn parse_literal(literal: &str) -> Option<f64> {
    let numeric = literal
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !numeric {
        return None;
    }
    literal.parse::<f64>().ok().filter(|f| !f.is_nan())
}

impl TryFrom<Decimal> for PositiveAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveAmount> for Decimal {
    fn from(amount: PositiveAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(
            PositiveAmount::new(Decimal::ZERO),
            Err(AmountError::NotPositive)
        );
        assert_eq!(
            PositiveAmount::new(Decimal::new(-1, 0)),
            Err(AmountError::NotPositive)
        );
    }

    #[test]
    fn test_coerce_str_trims() {
        let amount = PositiveAmount::coerce_str("  1500.00 ").unwrap();
        assert_eq!(amount.get(), Decimal::new(1500, 0));
    }

    #[test]
    fn test_coerce_str_scientific() {
        let amount = PositiveAmount::coerce_str("2.5e2").unwrap();
        assert_eq!(amount.get(), Decimal::new(250, 0));
    }

    #[test]
    fn test_coerce_str_empty_is_zero() {
        assert_eq!(PositiveAmount::coerce_str("   "), Err(AmountError::NotPositive));
    }

    #[test]
    fn test_coerce_str_garbage() {
        assert!(matches!(
            PositiveAmount::coerce_str("ten taka"),
            Err(AmountError::NotANumber(_))
        ));
    }

    #[test]
    fn test_coerce_str_out_of_range() {
        for literal in ["1e30", "100000000000000000000000000000", "1e-30", "1e400"] {
            assert_eq!(
                PositiveAmount::coerce_str(literal),
                Err(AmountError::OutOfRange(literal.to_owned())),
                "{literal}"
            );
        }
        assert_eq!(
            PositiveAmount::coerce_str("0.00000000000000000000000000001"),
            Err(AmountError::OutOfRange(
                "0.00000000000000000000000000001".to_owned()
            ))
        );
    }

    #[test]
    fn test_coerce_str_huge_negative_is_not_positive() {
        assert_eq!(
            PositiveAmount::coerce_str("-1e30"),
            Err(AmountError::NotPositive)
        );
    }

    #[test]
    fn test_coerce_str_rejects_infinity_spelling() {
        assert!(matches!(
            PositiveAmount::coerce_str("inf"),
            Err(AmountError::NotANumber(_))
        ));
    }

    #[test]
    fn test_coerce_number() {
        let n = serde_json::Number::from_f64(99.5).unwrap();
        let amount = PositiveAmount::coerce_number(&n).unwrap();
        assert_eq!(amount.get(), Decimal::new(995, 1));

        let zero = serde_json::Number::from(0);
        assert!(PositiveAmount::coerce_number(&zero).is_err());
    }

    #[test]
    fn test_deserialize_enforces_positive() {
        assert!(serde_json::from_str::<PositiveAmount>("\"12.5\"").is_ok());
        assert!(serde_json::from_str::<PositiveAmount>("\"-3\"").is_err());
    }
}
