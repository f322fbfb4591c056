//! # Remote Operations
//!
//! Every endpoint of the dealership API the client consumes, with its HTTP
//! method, relative path and authentication requirement.

use crate::domain::value_objects::{ReservationId, VehicleStatus};
use crate::infrastructure::remote::dto;
use reqwest::Method;
use std::fmt;

/// A logical call to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List catalog vehicles, optionally filtered by availability.
    ListVehicles {
        /// Availability filter; `None` lists everything.
        status: Option<VehicleStatus>,
    },
    /// List catalog accessories.
    ListAccessories,
    /// Price a selection without persisting anything.
    Simulate,
    /// Persist a binding quote for a selection.
    IssueQuote,
    /// Consume a quote into a reservation and charge the deposit.
    CreateReservation,
    /// Cancel an active reservation.
    CancelReservation {
        /// Reservation to cancel.
        id: ReservationId,
    },
    /// List the caller's quotes.
    ListQuotes,
    /// List the caller's reservations.
    ListReservations,
}

impl Operation {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::ListVehicles { .. }
            | Self::ListAccessories
            | Self::ListQuotes
            | Self::ListReservations => Method::GET,
            Self::Simulate
            | Self::IssueQuote
            | Self::CreateReservation
            | Self::CancelReservation { .. } => Method::POST,
        }
    }

    /// Returns the path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::ListVehicles { .. } => "vehiculos/".to_string(),
            Self::ListAccessories => "accesorios/".to_string(),
            Self::Simulate => "cotizaciones/simular/".to_string(),
            Self::IssueQuote => "cotizaciones/generar/".to_string(),
            Self::CreateReservation => "reservas/crear/".to_string(),
            Self::CancelReservation { id } => format!("reservas/{id}/cancelar/"),
            Self::ListQuotes => "cotizaciones/".to_string(),
            Self::ListReservations => "reservas/".to_string(),
        }
    }

    /// Returns the query string pairs.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::ListVehicles {
                status: Some(status),
            } => vec![("estado", dto::vehicle_status_to_wire(*status))],
            _ => Vec::new(),
        }
    }

    /// Returns true if the remote service requires a credential.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::IssueQuote
                | Self::CreateReservation
                | Self::CancelReservation { .. }
                | Self::ListQuotes
                | Self::ListReservations
        )
    }

    /// Returns true if the call changes remote state.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::IssueQuote | Self::CreateReservation | Self::CancelReservation { .. }
        )
    }

    /// Returns a stable name for logs and counters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListVehicles { .. } => "list_vehicles",
            Self::ListAccessories => "list_accessories",
            Self::Simulate => "simulate",
            Self::IssueQuote => "issue_quote",
            Self::CreateReservation => "create_reservation",
            Self::CancelReservation { .. } => "cancel_reservation",
            Self::ListQuotes => "list_quotes",
            Self::ListReservations => "list_reservations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
