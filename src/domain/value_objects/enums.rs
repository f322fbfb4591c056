//! # Domain Enums
//!
//! Status enumerations for catalog vehicles and reservations.
//!
//! - [`VehicleStatus`] - Availability of a vehicle in the catalog
//! - [`ReservationStatus`] - Lifecycle status of a reservation
//!
//! All enums implement `Display`, `FromStr` and Serde traits using
//! `SCREAMING_SNAKE_CASE` names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an enum from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEnumError {
    /// The value is not a known variant.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Availability of a vehicle in the catalog.
///
/// # Examples
///
/// ```
/// use dealer_reservation::domain::value_objects::enums::VehicleStatus;
///
/// let status: VehicleStatus = "available".parse().unwrap();
/// assert!(status.is_available());
/// assert_eq!(status.to_string(), "AVAILABLE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    /// Can be quoted and reserved.
    #[default]
    Available,
    /// Held by an active reservation.
    Reserved,
    /// Sold.
    Sold,
    /// Withdrawn from sale by the dealership.
    Disabled,
}

impl VehicleStatus {
    /// Returns true if the vehicle can be quoted and reserved.
    #[inline]
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Sold => "SOLD",
            Self::Disabled => "DISABLED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for VehicleStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "RESERVED" => Ok(Self::Reserved),
            "SOLD" => Ok(Self::Sold),
            "DISABLED" => Ok(Self::Disabled),
            _ => Err(ParseEnumError::InvalidValue("VehicleStatus", s.to_string())),
        }
    }
}

/// Lifecycle status of a reservation.
///
/// `Active` is the only non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Deposit paid, vehicle held.
    Active,
    /// Cancelled by the buyer; deposit refunded.
    Cancelled,
    /// Hold lapsed without a sale.
    Expired,
    /// Converted into a sale.
    Completed,
}

impl ReservationStatus {
    /// Returns true for statuses that can no longer change.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Returns true for the status a successful cancellation leaves behind.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
            Self::Completed => "COMPLETED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseEnumError::InvalidValue(
                "ReservationStatus",
                s.to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod vehicle_status {
        use super::*;

        #[test]
        fn only_available_is_available() {
            assert!(VehicleStatus::Available.is_available());
            assert!(!VehicleStatus::Reserved.is_available());
            assert!(!VehicleStatus::Sold.is_available());
            assert!(!VehicleStatus::Disabled.is_available());
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!("sold".parse::<VehicleStatus>().unwrap(), VehicleStatus::Sold);
        }

        #[test]
        fn parse_rejects_unknown() {
            let err = "LEASED".parse::<VehicleStatus>().unwrap_err();
            assert!(err.to_string().contains("LEASED"));
        }

        #[test]
        fn serde_uses_screaming_case() {
            let json = serde_json::to_string(&VehicleStatus::Reserved).unwrap();
            assert_eq!(json, "\"RESERVED\"");
        }
    }

    mod reservation_status {
        use super::*;

        #[test]
        fn active_is_not_terminal() {
            assert!(!ReservationStatus::Active.is_terminal());
            assert!(ReservationStatus::Cancelled.is_terminal());
            assert!(ReservationStatus::Expired.is_terminal());
            assert!(ReservationStatus::Completed.is_terminal());
        }

        #[test]
        fn display_round_trips_through_from_str() {
            for status in [
                ReservationStatus::Active,
                ReservationStatus::Cancelled,
                ReservationStatus::Expired,
                ReservationStatus::Completed,
            ] {
                assert_eq!(status.to_string().parse::<ReservationStatus>().unwrap(), status);
            }
        }
    }
}
