//! # Checked Arithmetic
//!
//! Traits and utilities for safe arithmetic on monetary values.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`round_to_minor_unit`] - Rounding to the currency's minor unit
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let a = Decimal::new(20000, 0);
//! let b = Decimal::new(500, 0);
//! assert_eq!(a.safe_add(b).unwrap(), Decimal::new(20500, 0));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places of the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Failure of a checked amount computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Rounds a decimal to the currency's minor unit (cents).
///
/// Midpoints round away from zero.
///
/// # Examples
///
/// ```
/// use dealer_reservation::domain::value_objects::arithmetic::round_to_minor_unit;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_minor_unit(Decimal::new(10255, 3)), Decimal::new(1026, 2));
/// ```
#[inline]
#[must_use]
pub fn round_to_minor_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Overflow-checked sums and products of amounts.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod arithmetic_error {
        use super::*;

        #[test]
        fn overflow_display() {
            assert_eq!(ArithmeticError::Overflow.to_string(), "arithmetic overflow");
        }
    }

    mod decimal {
        use super::*;

        #[test]
        fn add_is_exact() {
            let sum = Decimal::new(1999, 2).safe_add(Decimal::new(1, 2)).unwrap();
            assert_eq!(sum, Decimal::new(20, 0));
        }

        #[test]
        fn add_overflow_is_reported() {
            assert_eq!(
                Decimal::MAX.safe_add(Decimal::ONE),
                Err(ArithmeticError::Overflow)
            );
        }

        #[test]
        fn mul_overflow_is_reported() {
            assert_eq!(
                Decimal::MAX.safe_mul(Decimal::TWO),
                Err(ArithmeticError::Overflow)
            );
        }
    }

    mod rounding {
        use super::*;

        #[test]
        fn keeps_exact_cents() {
            assert_eq!(round_to_minor_unit(Decimal::new(102500, 2)), Decimal::new(102500, 2));
        }

        #[test]
        fn rounds_midpoint_away_from_zero() {
            assert_eq!(round_to_minor_unit(Decimal::new(1005, 3)), Decimal::new(101, 2));
        }

        #[test]
        fn truncates_below_midpoint() {
            assert_eq!(round_to_minor_unit(Decimal::new(10049, 4)), Decimal::new(100, 2));
        }
    }
}
