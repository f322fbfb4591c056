//! # Simulation Result
//!
//! Non-binding, itemized price estimate for a [`Selection`].
//!
//! A result is never persisted and has no identity. It is built only
//! through [`SimulationResult::from_lines`], which derives the total from
//! the lines so that `total == Σ lines` always holds.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::entities::simulation::{LineItem, SimulationResult};
//! use dealer_reservation::domain::value_objects::{AccessoryId, Money, VehicleId};
//!
//! let vehicle = VehicleId::new_v4();
//! let mats = AccessoryId::new_v4();
//!
//! let result = SimulationResult::from_lines(
//!     vehicle,
//!     vec![
//!         LineItem::vehicle(vehicle, "Corolla", Money::from_units(20000)),
//!         LineItem::accessory(mats, "Floor mats", Money::from_units(300)),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(result.total(), Money::from_units(20300));
//! ```

use crate::domain::entities::selection::{AccessorySelection, Selection};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{AccessoryId, Money, VehicleId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a line item prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineKind {
    /// The vehicle's base price.
    Vehicle,
    /// One selected accessory.
    Accessory,
}

/// One priced line of a simulation or quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    kind: LineKind,
    item_id: Uuid,
    label: String,
    amount: Money,
}

impl LineItem {
    /// Creates the vehicle line.
    #[must_use]
    pub fn vehicle(id: VehicleId, label: impl Into<String>, amount: Money) -> Self {
        Self {
            kind: LineKind::Vehicle,
            item_id: *id.as_uuid(),
            label: label.into(),
            amount,
        }
    }

    /// Creates an accessory line.
    #[must_use]
    pub fn accessory(id: AccessoryId, label: impl Into<String>, amount: Money) -> Self {
        Self {
            kind: LineKind::Accessory,
            item_id: *id.as_uuid(),
            label: label.into(),
            amount,
        }
    }

    /// Returns the line kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns the priced item's identifier.
    #[inline]
    #[must_use]
    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    /// Returns the accessory ID, if this is an accessory line.
    #[must_use]
    pub fn accessory_id(&self) -> Option<AccessoryId> {
        match self.kind {
            LineKind::Accessory => Some(AccessoryId::new(self.item_id)),
            LineKind::Vehicle => None,
        }
    }

    /// Returns the display label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the line amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<32} {:>12}", self.label, self.amount)
    }
}

/// Non-binding price estimate.
///
/// # Invariants
///
/// - The first line prices the vehicle; every other line prices an accessory
/// - No accessory appears twice
/// - `total` equals the checked sum of all line amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    vehicle_id: VehicleId,
    accessories: AccessorySelection,
    lines: Vec<LineItem>,
    total: Money,
}

impl SimulationResult {
    /// Builds a result from its lines, computing the total.
    ///
    /// # Errors
    ///
    /// - `DomainError::ValidationError` if the lines do not start with exactly
    ///   one vehicle line for `vehicle_id` or repeat an accessory
    /// - `DomainError::Arithmetic` if the total overflows
    pub fn from_lines(vehicle_id: VehicleId, lines: Vec<LineItem>) -> DomainResult<Self> {
        let Some((head, rest)) = lines.split_first() else {
            return Err(DomainError::ValidationError(
                "simulation has no line items".to_string(),
            ));
        };
        if head.kind() != LineKind::Vehicle || head.item_id() != *vehicle_id.as_uuid() {
            return Err(DomainError::ValidationError(format!(
                "first line must price vehicle {vehicle_id}"
            )));
        }

        let mut accessories = AccessorySelection::new();
        for line in rest {
            let Some(id) = line.accessory_id() else {
                return Err(DomainError::ValidationError(
                    "simulation has more than one vehicle line".to_string(),
                ));
            };
            if !accessories.toggle(id) {
                return Err(DomainError::ValidationError(format!(
                    "accessory {id} priced twice"
                )));
            }
        }

        let total = Money::checked_sum(lines.iter().map(LineItem::amount))?;
        Ok(Self {
            vehicle_id,
            accessories,
            lines,
            total,
        })
    }

    /// Returns the priced vehicle.
    #[inline]
    #[must_use]
    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    /// Returns the priced accessories, in line order.
    #[inline]
    #[must_use]
    pub fn accessories(&self) -> &AccessorySelection {
        &self.accessories
    }

    /// Returns all lines, vehicle first.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Returns the accessory lines.
    pub fn accessory_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().skip(1)
    }

    /// Returns the estimated total.
    #[inline]
    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns true if this estimate was computed for `selection`.
    ///
    /// Accessory order is ignored.
    #[must_use]
    pub fn matches(&self, selection: &Selection) -> bool {
        self.vehicle_id == selection.vehicle().id() && &self.accessories == selection.accessories()
    }
}
