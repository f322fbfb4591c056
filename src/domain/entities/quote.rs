//! # Quote Entity
//!
//! A binding, time-limited price commitment issued by the remote service.
//!
//! This module provides the [`Quote`] projection held by the client. The
//! remote service owns the quote; the client never flips its validity flag,
//! it only re-reads it.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::entities::quote::QuoteBuilder;
//! use dealer_reservation::domain::value_objects::{DepositRate, Money, QuoteId, Timestamp};
//!
//! let quote = QuoteBuilder::new(QuoteId::new_v4(), Money::from_units(20500))
//!     .expires_at(Timestamp::now().add_hours(48))
//!     .build();
//!
//! assert!(quote.is_usable());
//! assert_eq!(
//!     quote.deposit_preview(DepositRate::default()).unwrap(),
//!     Money::from_units(1025)
//! );
//! ```

use crate::domain::entities::simulation::{LineItem, LineKind};
use crate::domain::value_objects::arithmetic::ArithmeticResult;
use crate::domain::value_objects::{DepositRate, Money, QuoteId, Timestamp, VehicleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quote issued by the remote service.
///
/// # Invariants
///
/// - `final_amount` is fixed at issuance
/// - Immutable on the client side, including the validity flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Server-assigned identifier.
    id: QuoteId,
    /// When the quote was issued.
    created_at: Timestamp,
    /// When the quote stops being redeemable, if the server reports it.
    expires_at: Option<Timestamp>,
    /// Validity flag as last observed.
    valid: bool,
    /// Amount committed at issuance.
    final_amount: Money,
    /// Vehicle and accessory lines with unit prices.
    lines: Vec<LineItem>,
}

impl Quote {
    /// Returns a builder for a quote with the given id and amount.
    #[must_use]
    pub fn builder(id: QuoteId, final_amount: Money) -> QuoteBuilder {
        QuoteBuilder::new(id, final_amount)
    }

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns when the quote was issued.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the quote expires, if known.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// Returns the validity flag as last observed.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the committed amount.
    #[inline]
    #[must_use]
    pub fn final_amount(&self) -> Money {
        self.final_amount
    }

    /// Returns the priced lines.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Returns the vehicles this quote covers.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.lines
            .iter()
            .filter(|line| line.kind() == LineKind::Vehicle)
            .map(|line| VehicleId::new(line.item_id()))
    }

    /// Returns true if the expiry is known and has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at.is_expired())
    }

    /// Returns true if the quote was valid when last observed and has not
    /// expired locally.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.valid && !self.is_expired()
    }

    /// Returns the time remaining until expiry, if known.
    #[must_use]
    pub fn time_to_expiry(&self) -> Option<std::time::Duration> {
        self.expires_at
            .map(|at| Timestamp::now().duration_until(&at))
    }

    /// Previews the deposit for this quote at `rate`.
    ///
    /// This is a display hint: the remote service computes the authoritative
    /// deposit when the reservation is created.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn deposit_preview(&self, rate: DepositRate) -> ArithmeticResult<Money> {
        self.final_amount.safe_mul_rate(rate)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validity = if self.valid { "valid" } else { "invalid" };
        write!(f, "Quote({} {} {validity})", self.id.short(), self.final_amount)
    }
}

/// Builder for constructing [`Quote`] projections.
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    id: QuoteId,
    final_amount: Money,
    created_at: Option<Timestamp>,
    expires_at: Option<Timestamp>,
    valid: bool,
    lines: Vec<LineItem>,
}

impl QuoteBuilder {
    /// Creates a builder for a valid quote with no lines.
    #[must_use]
    pub fn new(id: QuoteId, final_amount: Money) -> Self {
        Self {
            id,
            final_amount,
            created_at: None,
            expires_at: None,
            valid: true,
            lines: Vec::new(),
        }
    }

    /// Sets the issuance time. Defaults to now.
    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub fn expires_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the validity flag reported by the server.
    #[must_use]
    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Appends a priced line.
    #[must_use]
    pub fn line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    /// Sets all priced lines.
    #[must_use]
    pub fn lines(mut self, lines: Vec<LineItem>) -> Self {
        self.lines = lines;
        self
    }

    /// Builds the quote.
    #[must_use]
    pub fn build(self) -> Quote {
        Quote {
            id: self.id,
            created_at: self.created_at.unwrap_or_default(),
            expires_at: self.expires_at,
            valid: self.valid,
            final_amount: self.final_amount,
            lines: self.lines,
        }
    }
}
