//! # Selection
//!
//! The single in-flight subject of the purchase workflow: one vehicle and an
//! ordered, duplicate-free set of accessories.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::entities::selection::AccessorySelection;
//! use dealer_reservation::domain::value_objects::AccessoryId;
//!
//! let a = AccessoryId::new_v4();
//! let b = AccessoryId::new_v4();
//!
//! let mut first = AccessorySelection::new();
//! first.toggle(a);
//! first.toggle(b);
//!
//! let second: AccessorySelection = [b, a].into_iter().collect();
//!
//! // Set semantics: order is kept for display but ignored for equality.
//! assert_eq!(first, second);
//! assert_eq!(first.as_slice(), &[a, b]);
//! ```

use crate::domain::entities::vehicle::Vehicle;
use crate::domain::value_objects::{AccessoryId, VehicleId};
use serde::{Deserialize, Serialize};

/// Ordered set of selected accessory IDs.
///
/// Keeps selection order for line-item display; equality ignores order.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessorySelection(Vec<AccessoryId>);

impl AccessorySelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` if absent, deselects it if present.
    ///
    /// Returns true if the accessory is selected afterwards.
    pub fn toggle(&mut self, id: AccessoryId) -> bool {
        if let Some(pos) = self.0.iter().position(|selected| *selected == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id);
            true
        }
    }

    /// Returns true if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &AccessoryId) -> bool {
        self.0.contains(id)
    }

    /// Returns the number of selected accessories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is selected.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the IDs in selection order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[AccessoryId] {
        &self.0
    }

    /// Iterates the IDs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &AccessoryId> {
        self.0.iter()
    }

    /// Removes every accessory.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl PartialEq for AccessorySelection {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|id| other.contains(id))
    }
}

impl FromIterator<AccessoryId> for AccessorySelection {
    /// Collects IDs, collapsing duplicates and keeping first occurrence order.
    fn from_iter<I: IntoIterator<Item = AccessoryId>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(&id) {
                selection.0.push(id);
            }
        }
        selection
    }
}

/// A vehicle plus the accessories chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    vehicle: Vehicle,
    accessories: AccessorySelection,
}

impl Selection {
    /// Starts a selection for `vehicle` with no accessories.
    #[must_use]
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            accessories: AccessorySelection::new(),
        }
    }

    /// Creates a selection with a preset accessory set.
    #[must_use]
    pub fn with_accessories(vehicle: Vehicle, accessories: AccessorySelection) -> Self {
        Self {
            vehicle,
            accessories,
        }
    }

    /// Returns the selected vehicle.
    #[inline]
    #[must_use]
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Returns the selected accessories.
    #[inline]
    #[must_use]
    pub fn accessories(&self) -> &AccessorySelection {
        &self.accessories
    }

    /// Toggles an accessory. See [`AccessorySelection::toggle`].
    pub fn toggle_accessory(&mut self, id: AccessoryId) -> bool {
        self.accessories.toggle(id)
    }

    /// Builds the pricing request for this selection.
    #[must_use]
    pub fn to_request(&self) -> SimulationRequest {
        SimulationRequest {
            vehicle_id: self.vehicle.id(),
            accessory_ids: self.accessories.clone(),
        }
    }
}

/// One pricing ask: a vehicle and a unique set of accessories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Vehicle to price.
    pub vehicle_id: VehicleId,
    /// Accessories to price with it.
    pub accessory_ids: AccessorySelection,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Money, VehicleStatus};

    fn vehicle() -> Vehicle {
        Vehicle::new(
            VehicleId::new_v4(),
            "Corolla",
            "Toyota",
            Money::from_units(20000),
            VehicleStatus::Available,
        )
    }

    mod accessory_selection {
        use super::*;

        #[test]
        fn toggle_adds_then_removes() {
            let id = AccessoryId::new_v4();
            let mut selection = AccessorySelection::new();

            assert!(selection.toggle(id));
            assert!(selection.contains(&id));
            assert!(!selection.toggle(id));
            assert!(selection.is_empty());
        }

        #[test]
        fn keeps_selection_order() {
            let ids = [AccessoryId::new_v4(), AccessoryId::new_v4(), AccessoryId::new_v4()];
            let mut selection = AccessorySelection::new();
            for id in ids {
                selection.toggle(id);
            }
            assert_eq!(selection.as_slice(), &ids);
        }

        #[test]
        fn collect_collapses_duplicates() {
            let a = AccessoryId::new_v4();
            let b = AccessoryId::new_v4();
            let selection: AccessorySelection = [a, b, a, a].into_iter().collect();
            assert_eq!(selection.as_slice(), &[a, b]);
        }

        #[test]
        fn equality_ignores_order() {
            let a = AccessoryId::new_v4();
            let b = AccessoryId::new_v4();
            let ab: AccessorySelection = [a, b].into_iter().collect();
            let ba: AccessorySelection = [b, a].into_iter().collect();
            let only_a: AccessorySelection = [a].into_iter().collect();

            assert_eq!(ab, ba);
            assert_ne!(ab, only_a);
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn request_mirrors_selection() {
            let accessory = AccessoryId::new_v4();
            let mut selection = Selection::new(vehicle());
            selection.toggle_accessory(accessory);

            let request = selection.to_request();
            assert_eq!(request.vehicle_id, selection.vehicle().id());
            assert_eq!(request.accessory_ids.as_slice(), &[accessory]);
        }

        #[test]
        fn serializes_accessories_as_plain_list() {
            let accessory = AccessoryId::new_v4();
            let selection: AccessorySelection = [accessory].into_iter().collect();
            let json = serde_json::to_string(&selection).unwrap();
            assert_eq!(json, format!("[\"{accessory}\"]"));
        }
    }
}
