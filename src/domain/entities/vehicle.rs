//! # Vehicle Entity
//!
//! A sellable unit from the dealership catalog.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::entities::vehicle::Vehicle;
//! use dealer_reservation::domain::value_objects::{Money, VehicleId, VehicleStatus};
//!
//! let vehicle = Vehicle::new(
//!     VehicleId::new_v4(),
//!     "Corolla",
//!     "Toyota",
//!     Money::from_units(20000),
//!     VehicleStatus::Available,
//! )
//! .with_year(2024);
//!
//! assert!(vehicle.is_available());
//! assert_eq!(vehicle.display_name(), "Toyota Corolla");
//! ```

use crate::domain::value_objects::{Money, VehicleId, VehicleStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vehicle listed in the catalog.
///
/// Read-only projection of the remote catalog record.
///
/// # Invariants
///
/// - Price is never negative (enforced by [`Money`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Catalog identifier.
    id: VehicleId,
    /// Model name, e.g. "Corolla".
    model_name: String,
    /// Brand name, e.g. "Toyota".
    brand_name: String,
    /// Base list price.
    price: Money,
    /// Model year, when published.
    year: Option<u16>,
    /// Catalog availability.
    status: VehicleStatus,
}

impl Vehicle {
    /// Creates a vehicle projection.
    #[must_use]
    pub fn new(
        id: VehicleId,
        model_name: impl Into<String>,
        brand_name: impl Into<String>,
        price: Money,
        status: VehicleStatus,
    ) -> Self {
        Self {
            id,
            model_name: model_name.into(),
            brand_name: brand_name.into(),
            price,
            year: None,
            status,
        }
    }

    /// Sets the model year.
    #[must_use]
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Replaces the availability status.
    #[must_use]
    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the vehicle ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Returns the model name.
    #[inline]
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the brand name.
    #[inline]
    #[must_use]
    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    /// Returns the base price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the model year, if known.
    #[inline]
    #[must_use]
    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Returns the availability status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Returns true if the vehicle can be quoted and reserved.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Returns "Brand Model", omitting an empty brand.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.brand_name.is_empty() {
            self.model_name.clone()
        } else {
            format!("{} {}", self.brand_name, self.model_name)
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({year}) {}", self.display_name(), self.price),
            None => write!(f, "{} {}", self.display_name(), self.price),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn corolla() -> Vehicle {
        Vehicle::new(
            VehicleId::new_v4(),
            "Corolla",
            "Toyota",
            Money::from_units(20000),
            VehicleStatus::Available,
        )
    }

    #[test]
    fn accessors_return_fields() {
        let vehicle = corolla().with_year(2023);
        assert_eq!(vehicle.model_name(), "Corolla");
        assert_eq!(vehicle.brand_name(), "Toyota");
        assert_eq!(vehicle.price(), Money::from_units(20000));
        assert_eq!(vehicle.year(), Some(2023));
    }

    #[test]
    fn reserved_vehicle_is_not_available() {
        let vehicle = Vehicle::new(
            VehicleId::new_v4(),
            "Hilux",
            "Toyota",
            Money::from_units(30000),
            VehicleStatus::Reserved,
        );
        assert!(!vehicle.is_available());
    }

    #[test]
    fn with_status_replaces_status() {
        let vehicle = corolla().with_status(VehicleStatus::Sold);
        assert_eq!(vehicle.status(), VehicleStatus::Sold);
    }

    #[test]
    fn display_name_without_brand() {
        let vehicle = Vehicle::new(
            VehicleId::new_v4(),
            "Corolla",
            "",
            Money::ZERO,
            VehicleStatus::Available,
        );
        assert_eq!(vehicle.display_name(), "Corolla");
    }

    #[test]
    fn display_includes_year_and_price() {
        let vehicle = corolla().with_year(2024);
        assert_eq!(vehicle.to_string(), "Toyota Corolla (2024) 20000.00");
    }
}
