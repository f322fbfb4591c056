//! # Catalog Service
//!
//! Read-only access to the vehicles and accessories the workflow selects
//! from. Catalog reads take no in-flight slot and may run alongside the
//! workflow's own calls.

use crate::domain::entities::{Accessory, Vehicle};
use crate::domain::value_objects::{AccessoryId, VehicleId, VehicleStatus};
use crate::infrastructure::remote::error::ServiceResult;
use crate::infrastructure::remote::traits::RemoteService;
use std::sync::Arc;
use tracing::debug;

/// Snapshot of the catalog as last loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
    accessories: Vec<Accessory>,
}

impl Catalog {
    /// Creates a catalog from already-fetched items.
    #[must_use]
    pub fn new(vehicles: Vec<Vehicle>, accessories: Vec<Accessory>) -> Self {
        Self {
            vehicles,
            accessories,
        }
    }

    /// Returns the vehicles, in server order.
    #[inline]
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Returns the accessories, in server order.
    #[inline]
    #[must_use]
    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    /// Looks up a vehicle.
    #[must_use]
    pub fn find_vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == *id)
    }

    /// Looks up an accessory.
    #[must_use]
    pub fn find_accessory(&self, id: &AccessoryId) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.id() == *id)
    }

    /// Returns true if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty() && self.accessories.is_empty()
    }
}

/// Catalog reads.
#[derive(Debug, Clone)]
pub struct CatalogService {
    remote: Arc<dyn RemoteService>,
}

impl CatalogService {
    /// Status filter used when the caller does not pick one.
    pub const DEFAULT_FILTER: Option<VehicleStatus> = Some(VehicleStatus::Available);

    /// Creates a new service.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    /// Lists vehicles with `status`; `None` lists every status.
    ///
    /// # Errors
    ///
    /// Any `ServiceError` from the remote service.
    pub async fn list_vehicles(&self, status: Option<VehicleStatus>) -> ServiceResult<Vec<Vehicle>> {
        self.remote.list_vehicles(status).await
    }

    /// Lists accessories.
    ///
    /// # Errors
    ///
    /// Any `ServiceError` from the remote service.
    pub async fn list_accessories(&self) -> ServiceResult<Vec<Accessory>> {
        self.remote.list_accessories().await
    }

    /// Fetches vehicles and accessories concurrently.
    ///
    /// # Errors
    ///
    /// The first `ServiceError` of either read.
    pub async fn load(&self, status: Option<VehicleStatus>) -> ServiceResult<Catalog> {
        let (vehicles, accessories) =
            tokio::join!(self.list_vehicles(status), self.list_accessories());
        let catalog = Catalog::new(vehicles?, accessories?);
        debug!(
            vehicles = catalog.vehicles().len(),
            accessories = catalog.accessories().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}
