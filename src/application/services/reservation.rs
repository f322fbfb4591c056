//! # Reservation Controller
//!
//! Consumes a quote into a deposit-secured [`Reservation`] and cancels it.
//!
//! # Cancellation
//!
//! Cancelling is destructive, so [`ReservationController::cancel`] takes a
//! [`CancellationConfirmation`] that can only be minted by the code that
//! asked the user. Retrying a cancellation is safe: if the server rejects
//! the call because the reservation is no longer active, the controller
//! re-reads the caller's reservations and reports
//! [`CancelOutcome::AlreadyCancelled`] when it is already cancelled.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::application::services::{CancelOutcome, CancellationConfirmation};
//!
//! let confirmation = CancellationConfirmation::confirmed_by_user();
//! # let _ = confirmation;
//! assert!(CancelOutcome::AlreadyCancelled.is_already_cancelled());
//! ```

use crate::domain::entities::Reservation;
use crate::domain::value_objects::{QuoteId, ReservationId};
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::traits::RemoteService;
use std::sync::Arc;
use tracing::{info, warn};

/// Proof that the user explicitly confirmed a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationConfirmation {
    _private: (),
}

impl CancellationConfirmation {
    /// Records that the user confirmed the cancellation.
    ///
    /// Call this only from the code path that asked the user.
    #[must_use]
    pub fn confirmed_by_user() -> Self {
        Self { _private: () }
    }
}

/// Result of a cancellation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// This call cancelled the reservation.
    Cancelled {
        /// Message reported by the server.
        message: Option<String>,
    },
    /// The reservation was already cancelled; nothing was refunded twice.
    AlreadyCancelled,
}

impl CancelOutcome {
    /// Returns true for [`CancelOutcome::AlreadyCancelled`].
    #[inline]
    #[must_use]
    pub fn is_already_cancelled(&self) -> bool {
        matches!(self, Self::AlreadyCancelled)
    }
}

/// Reservation and cancellation controller.
#[derive(Debug, Clone)]
pub struct ReservationController {
    remote: Arc<dyn RemoteService>,
}

impl ReservationController {
    /// Creates a new controller.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    /// Consumes `quote_id` into a reservation.
    ///
    /// The returned reservation is active, belongs to `quote_id` and expires
    /// in the future.
    ///
    /// # Errors
    ///
    /// - `ServiceError::RemoteRejected` with the server message verbatim,
    ///   e.g. when the quote expired or was already consumed
    /// - `ServiceError::InvalidResponse` if the reservation breaks the
    ///   guarantees above
    /// - Any other `ServiceError` from the remote service, unchanged
    pub async fn reserve(&self, quote_id: &QuoteId) -> ServiceResult<Reservation> {
        let reservation = self.remote.create_reservation(quote_id).await?;

        let problem = if reservation.quote_id() != *quote_id {
            Some(format!(
                "reservation {} belongs to quote {}",
                reservation.id(),
                reservation.quote_id()
            ))
        } else if !reservation.is_active() {
            Some(format!(
                "reservation {} created with status {}",
                reservation.id(),
                reservation.status()
            ))
        } else if reservation.expires_at().is_expired() {
            Some(format!(
                "reservation {} already expired at {}",
                reservation.id(),
                reservation.expires_at()
            ))
        } else {
            None
        };
        if let Some(message) = problem {
            warn!(quote_id = %quote_id, reason = %message, "reservation reply rejected");
            return Err(ServiceError::invalid_response(message));
        }

        info!(
            reservation_id = %reservation.id(),
            quote_id = %quote_id,
            deposit = %reservation.deposit(),
            "reservation created"
        );
        Ok(reservation)
    }

    /// Cancels reservation `id`.
    ///
    /// # Errors
    ///
    /// - The rejection as received if the server refuses the call and the
    ///   reservation is not observed as cancelled afterwards
    /// - Any other `ServiceError` from the remote service, unchanged
    pub async fn cancel(
        &self,
        id: &ReservationId,
        _confirmation: CancellationConfirmation,
    ) -> ServiceResult<CancelOutcome> {
        match self.remote.cancel_reservation(id).await {
            Ok(receipt) => {
                info!(reservation_id = %id, "reservation cancelled");
                Ok(CancelOutcome::Cancelled {
                    message: receipt.message,
                })
            }
            Err(error) if error.is_rejected() => {
                if self.is_cancelled_remotely(id).await {
                    info!(reservation_id = %id, "reservation was already cancelled");
                    Ok(CancelOutcome::AlreadyCancelled)
                } else {
                    Err(error)
                }
            }
            Err(error) => Err(error),
        }
    }

    async fn is_cancelled_remotely(&self, id: &ReservationId) -> bool {
        match self.remote.list_reservations().await {
            Ok(reservations) => reservations
                .iter()
                .any(|r| r.id() == *id && r.is_cancelled()),
            Err(e) => {
                warn!(reservation_id = %id, error = %e, "could not re-read reservations");
                false
            }
        }
    }
}
