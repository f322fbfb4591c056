//! # Money and Deposit Rate
//!
//! Non-negative decimal amounts and the fraction used to preview deposits.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::value_objects::{DepositRate, Money};
//! use rust_decimal::Decimal;
//!
//! let total = Money::new(Decimal::new(20500, 0)).unwrap();
//! let rate = DepositRate::from_percent(Decimal::new(5, 0)).unwrap();
//! assert_eq!(total.safe_mul_rate(rate).unwrap().amount(), Decimal::new(1025, 0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{
    round_to_minor_unit, ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative monetary amount.
///
/// # Invariants
///
/// - Never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is negative.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::InvalidAmount(format!(
                "amount must not be negative, got {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Creates an amount from whole currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds another amount.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }

    /// Scales this amount by a deposit rate, rounded to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_mul_rate(self, rate: DepositRate) -> ArithmeticResult<Self> {
        self.0
            .safe_mul(rate.fraction())
            .map(|value| Self(round_to_minor_unit(value)))
    }

    /// Sums amounts with overflow checking.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn checked_sum<I>(amounts: I) -> ArithmeticResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.safe_add(amount))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Fraction of a quote's final amount charged as deposit.
///
/// The authoritative rate is owned by the remote service; the client holds
/// a copy only to preview the deposit before the user confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DepositRate(Decimal);

impl DepositRate {
    /// Creates a rate from a fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if the fraction is outside `[0, 1]`.
    pub fn from_fraction(fraction: Decimal) -> DomainResult<Self> {
        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(DomainError::InvalidRate(format!(
                "deposit rate must be within [0, 1], got {fraction}"
            )));
        }
        Ok(Self(fraction))
    }

    /// Creates a rate from a percentage in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if the percentage is outside `[0, 100]`.
    pub fn from_percent(percent: Decimal) -> DomainResult<Self> {
        let fraction = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(DomainError::Arithmetic(ArithmeticError::Overflow))?;
        Self::from_fraction(fraction)
    }

    /// Returns the rate as a fraction.
    #[inline]
    #[must_use]
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }
}

impl Default for DepositRate {
    /// Five percent, the rate observed on the remote service.
    fn default() -> Self {
        Self(Decimal::new(5, 2))
    }
}

impl TryFrom<Decimal> for DepositRate {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_fraction(value)
    }
}

impl From<DepositRate> for Decimal {
    fn from(rate: DepositRate) -> Self {
        rate.0
    }
}

impl fmt::Display for DepositRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent().normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod money {
        use super::*;

        #[test]
        fn rejects_negative() {
            let result = Money::new(Decimal::new(-1, 2));
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn accepts_zero() {
            assert!(Money::new(Decimal::ZERO).unwrap().is_zero());
        }

        #[test]
        fn checked_sum_adds_all() {
            let total = Money::checked_sum([
                Money::from_units(20000),
                Money::from_units(500),
                Money::from_units(300),
            ])
            .unwrap();
            assert_eq!(total, Money::from_units(20800));
        }

        #[test]
        fn checked_sum_of_nothing_is_zero() {
            assert_eq!(Money::checked_sum(Vec::new()).unwrap(), Money::ZERO);
        }

        #[test]
        fn display_uses_two_decimals() {
            assert_eq!(Money::from_units(20500).to_string(), "20500.00");
        }

        #[test]
        fn deserializes_from_string_and_number() {
            let from_str: Money = serde_json::from_str("\"25000.00\"").unwrap();
            let from_num: Money = serde_json::from_str("25000").unwrap();
            assert_eq!(from_str, from_num);
        }

        #[test]
        fn deserializes_cents_as_an_amount_field() {
            #[derive(Deserialize)]
            struct Deposit {
                importe: Money,
            }
            let deposit: Deposit = serde_json::from_str(r#"{"importe": "1025.50"}"#).unwrap();
            assert_eq!(deposit.importe.amount(), Decimal::new(102550, 2));
        }

        #[test]
        fn deserialize_rejects_negative() {
            let result: Result<Money, _> = serde_json::from_str("\"-3.00\"");
            assert!(result.is_err());
        }

        #[test]
        fn deposit_is_rounded_to_cents() {
            let total = Money::new(Decimal::new(12345, 2)).unwrap();
            let deposit = total.safe_mul_rate(DepositRate::default()).unwrap();
            assert_eq!(deposit.amount(), Decimal::new(617, 2));
        }
    }

    mod deposit_rate {
        use super::*;

        #[test]
        fn default_is_five_percent() {
            assert_eq!(DepositRate::default().percent(), Decimal::new(5, 0));
            assert_eq!(DepositRate::default().to_string(), "5%");
        }

        #[test]
        fn rejects_rate_above_one() {
            assert!(DepositRate::from_fraction(Decimal::new(11, 1)).is_err());
        }

        #[test]
        fn rejects_negative_percent() {
            assert!(DepositRate::from_percent(Decimal::new(-5, 0)).is_err());
        }

        #[test]
        fn percent_and_fraction_agree() {
            let a = DepositRate::from_percent(Decimal::new(10, 0)).unwrap();
            let b = DepositRate::from_fraction(Decimal::new(1, 1)).unwrap();
            assert_eq!(a, b);
        }
    }
}
