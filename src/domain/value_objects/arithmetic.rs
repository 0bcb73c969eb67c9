//! # Checked Arithmetic
//!
//! Overflow-checked decimal operations and the two rounding rules of the
//! engine.
//!
//! Cost amounts keep full `Decimal` precision through every step of a
//! calculation. [`round_currency`] is applied only when a value is shown;
//! [`round_score`] fixes selection scores and match percentages to two
//! places so that ordering is stable across runs.
//!
//! # Examples
//!
//! ```
//! use rfp_engine::domain::value_objects::arithmetic::{round_currency, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let base = Decimal::new(1_250, 2).safe_mul(Decimal::new(3, 0)).unwrap();
//! assert_eq!(base, Decimal::new(3_750, 2));
//! assert_eq!(round_currency(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places shown for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// A checked operation left the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// The result does not fit in a `Decimal`.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result of a checked operation.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Addition and multiplication that report overflow instead of panicking.
pub trait CheckedArithmetic: Sized {
    /// Adds `rhs`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the sum is out of range.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Multiplies by `rhs`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the product is out of range.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds to cents, half away from zero.
#[inline]
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a 0–100 score to two decimal places.
#[inline]
#[must_use]
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod checked {
        use super::*;

        #[test]
        fn add_and_mul_succeed() {
            let a = Decimal::new(150, 2);
            assert_eq!(a.safe_add(Decimal::ONE).unwrap(), Decimal::new(250, 2));
            assert_eq!(a.safe_mul(Decimal::TWO).unwrap(), Decimal::new(300, 2));
        }

        #[test]
        fn overflow_is_reported() {
            assert_eq!(Decimal::MAX.safe_mul(Decimal::TWO), Err(ArithmeticError::Overflow));
            assert_eq!(Decimal::MAX.safe_add(Decimal::ONE), Err(ArithmeticError::Overflow));
        }
    }

    mod rounding {
        use super::*;

        #[test]
        fn currency_rounds_half_away_from_zero() {
            assert_eq!(round_currency(Decimal::new(1_005, 3)), Decimal::new(101, 2));
            assert_eq!(round_currency(Decimal::new(-1_005, 3)), Decimal::new(-101, 2));
            assert_eq!(round_currency(Decimal::new(1_004, 3)), Decimal::new(100, 2));
        }

        #[test]
        fn score_rounds_to_two_places() {
            assert!((round_score(66.666_666) - 66.67).abs() < f64::EPSILON);
            assert!((round_score(100.0) - 100.0).abs() < f64::EPSILON);
        }
    }
}
