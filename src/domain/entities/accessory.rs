//! # Accessory Entity
//!
//! An optional add-on that can be priced together with a vehicle.

use crate::domain::value_objects::{AccessoryId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An optional add-on from the catalog.
///
/// # Examples
///
/// ```
/// use dealer_reservation::domain::entities::accessory::Accessory;
/// use dealer_reservation::domain::value_objects::{AccessoryId, Money};
///
/// let mats = Accessory::new(AccessoryId::new_v4(), "Floor mats", Money::from_units(300))
///     .with_description("All-weather rubber");
///
/// assert_eq!(mats.description(), Some("All-weather rubber"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    id: AccessoryId,
    name: String,
    price: Money,
    description: Option<String>,
}

impl Accessory {
    /// Creates an accessory projection.
    #[must_use]
    pub fn new(id: AccessoryId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the accessory ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    /// Returns the name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the description, if any.
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{})", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_defaults_to_none() {
        let accessory = Accessory::new(AccessoryId::new_v4(), "Roof rack", Money::from_units(500));
        assert!(accessory.description().is_none());
    }

    #[test]
    fn display_shows_surcharge() {
        let accessory = Accessory::new(AccessoryId::new_v4(), "Roof rack", Money::from_units(500));
        assert_eq!(accessory.to_string(), "Roof rack (+500.00)");
    }
}
