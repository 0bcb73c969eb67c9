//! # Money Value Object
//!
//! Non-negative fixed-point currency amount.
//!
//! [`Money`] wraps a `rust_decimal::Decimal` and keeps full precision; use
//! [`Money::rounded`] or the `Display` impl for two-decimal presentation.
//!
//! # Examples
//!
//! ```
//! use rfp_engine::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::new(Decimal::new(12_505, 3)).unwrap();
//! assert_eq!(price.to_string(), "12.51");
//! assert!(Money::new(Decimal::NEGATIVE_ONE).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{round_currency, CheckedArithmetic};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A non-negative currency amount.
///
/// # Invariants
///
/// - Never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is negative.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "currency amount must not be negative: {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Creates an amount from whole currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal at full precision.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to two decimal places.
    #[inline]
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_currency(self.0)
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Lossy conversion used for normalised scoring only.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Safely adds another amount.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error on overflow.
    pub fn safe_add(self, rhs: Self) -> DomainResult<Self> {
        Ok(Self(self.0.safe_add(rhs.0)?))
    }

    /// Safely multiplies by a non-negative factor such as a quantity or rate.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error on overflow, or a validation error if the
    /// factor is negative.
    pub fn safe_mul(self, factor: Decimal) -> DomainResult<Self> {
        Self::new(self.0.safe_mul(factor)?)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::new(Decimal::new(-1, 2)).unwrap_err().is_validation());
        assert!(Money::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn display_rounds_but_value_keeps_precision() {
        let m = Money::new(Decimal::new(1_234_567, 5)).unwrap();
        assert_eq!(m.to_string(), "12.35");
        assert_eq!(m.get(), Decimal::new(1_234_567, 5));
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_units(10);
        let b = Money::from_units(5);
        assert_eq!(a.safe_add(b).unwrap(), Money::from_units(15));
        assert_eq!(a.safe_mul(Decimal::new(15, 1)).unwrap(), Money::from_units(15));
        assert!(a.safe_mul(Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn deserialize_accepts_strings_and_numbers() {
        let from_str: Money = serde_json::from_str("\"99.95\"").unwrap();
        assert_eq!(from_str.get(), Decimal::new(9_995, 2));
        let from_num: Money = serde_json::from_str("250").unwrap();
        assert_eq!(from_num, Money::from_units(250));
        assert!(serde_json::from_str::<Money>("\"-3\"").is_err());
    }
}
