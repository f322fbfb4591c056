//! # Reservation Entity
//!
//! A deposit-secured hold on a vehicle, created by consuming a quote.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::entities::reservation::Reservation;
//! use dealer_reservation::domain::value_objects::{
//!     Money, QuoteId, ReservationId, ReservationStatus, Timestamp,
//! };
//!
//! let mut reservation = Reservation::builder(ReservationId::new_v4(), QuoteId::new_v4())
//!     .number("RES-0001")
//!     .deposit(Money::from_units(1025))
//!     .expires_at(Timestamp::now().add_days(7))
//!     .build();
//!
//! assert!(reservation.is_active());
//! reservation.mark_cancelled().unwrap();
//! assert_eq!(reservation.status(), ReservationStatus::Cancelled);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, QuoteId, ReservationId, ReservationStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reservation projection.
///
/// # Invariants
///
/// - References exactly one consumed quote
/// - Once `Cancelled`, the status never changes again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    /// Human-facing reservation number.
    number: String,
    status: ReservationStatus,
    /// Deposit charged by the remote service.
    deposit: Money,
    expires_at: Timestamp,
    quote_id: QuoteId,
    created_at: Timestamp,
    /// Deposit payment reference, when the server reports it.
    payment_number: Option<String>,
}

impl Reservation {
    /// Returns a builder for a reservation of `quote_id`.
    #[must_use]
    pub fn builder(id: ReservationId, quote_id: QuoteId) -> ReservationBuilder {
        ReservationBuilder::new(id, quote_id)
    }

    /// Returns the reservation ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the reservation number.
    #[inline]
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the status as last observed.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the deposit amount.
    #[inline]
    #[must_use]
    pub fn deposit(&self) -> Money {
        self.deposit
    }

    /// Returns when the hold lapses.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns the consumed quote.
    #[inline]
    #[must_use]
    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    /// Returns when the reservation was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the deposit payment reference, if any.
    #[inline]
    #[must_use]
    pub fn payment_number(&self) -> Option<&str> {
        self.payment_number.as_deref()
    }

    /// Returns true if the status is `Active`.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Returns true if the reservation is cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    /// Records a confirmed cancellation.
    ///
    /// Cancelling an already cancelled reservation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the reservation is expired
    /// or completed.
    pub fn mark_cancelled(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Active => {
                self.status = ReservationStatus::Cancelled;
                Ok(())
            }
            ReservationStatus::Cancelled => Ok(()),
            other => Err(DomainError::ValidationError(format!(
                "cannot cancel a reservation in status {other}"
            ))),
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation({} {} deposit {})",
            self.number, self.status, self.deposit
        )
    }
}

/// Builder for constructing [`Reservation`] projections.
#[derive(Debug, Clone)]
pub struct ReservationBuilder {
    id: ReservationId,
    quote_id: QuoteId,
    number: String,
    status: ReservationStatus,
    deposit: Money,
    expires_at: Option<Timestamp>,
    created_at: Option<Timestamp>,
    payment_number: Option<String>,
}

impl ReservationBuilder {
    /// Creates a builder for an active reservation.
    #[must_use]
    pub fn new(id: ReservationId, quote_id: QuoteId) -> Self {
        Self {
            id,
            quote_id,
            number: String::new(),
            status: ReservationStatus::Active,
            deposit: Money::ZERO,
            expires_at: None,
            created_at: None,
            payment_number: None,
        }
    }

    /// Sets the reservation number.
    #[must_use]
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the deposit.
    #[must_use]
    pub fn deposit(mut self, deposit: Money) -> Self {
        self.deposit = deposit;
        self
    }

    /// Sets the expiry. Defaults to now.
    #[must_use]
    pub fn expires_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the creation time. Defaults to now.
    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the deposit payment reference.
    #[must_use]
    pub fn payment_number(mut self, payment_number: impl Into<String>) -> Self {
        self.payment_number = Some(payment_number.into());
        self
    }

    /// Builds the reservation.
    #[must_use]
    pub fn build(self) -> Reservation {
        Reservation {
            id: self.id,
            number: self.number,
            status: self.status,
            deposit: self.deposit,
            expires_at: self.expires_at.unwrap_or_default(),
            quote_id: self.quote_id,
            created_at: self.created_at.unwrap_or_default(),
            payment_number: self.payment_number,
        }
    }
}
