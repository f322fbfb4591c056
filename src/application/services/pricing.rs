//! # Pricing Simulation Engine
//!
//! Prices a [`Selection`] through the remote service and checks that the
//! answer really describes that selection.
//!
//! # Reply Contract
//!
//! - Exactly one vehicle line, first, for the selected vehicle
//! - One accessory line per selected accessory, in selection order
//! - Reported total equals the sum of the lines
//!
//! A reply breaking any of these is reported as
//! [`ServiceError::InvalidResponse`]. Nothing is persisted; the result is
//! advisory and the workflow discards it on any selection edit.

use crate::domain::entities::{Selection, SimulationResult};
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::traits::RemoteService;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pricing simulation engine.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    remote: Arc<dyn RemoteService>,
}

impl PricingEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    /// Prices `selection`.
    ///
    /// # Errors
    ///
    /// - Any `ServiceError` from the remote service, unchanged
    /// - `ServiceError::InvalidResponse` if the reply breaks the contract
    pub async fn simulate(&self, selection: &Selection) -> ServiceResult<SimulationResult> {
        let request = selection.to_request();
        let breakdown = self.remote.simulate(&request).await?;

        let result = SimulationResult::from_lines(request.vehicle_id, breakdown.lines)
            .map_err(|e| reject_reply(e.to_string()))?;

        if result.accessories().as_slice() != request.accessory_ids.as_slice() {
            return Err(reject_reply(format!(
                "priced {} accessories, {} requested in a different set or order",
                result.accessories().len(),
                request.accessory_ids.len()
            )));
        }
        if result.total() != breakdown.total {
            return Err(reject_reply(format!(
                "reported total {} does not match line sum {}",
                breakdown.total,
                result.total()
            )));
        }

        debug!(
            vehicle_id = %request.vehicle_id,
            accessories = request.accessory_ids.len(),
            total = %result.total(),
            "simulation priced"
        );
        Ok(result)
    }
}

fn reject_reply(message: String) -> ServiceError {
    warn!(reason = %message, "simulation reply rejected");
    ServiceError::invalid_response(message)
}
