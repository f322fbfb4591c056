//! # Application Services
//!
//! Services that drive the remote dealership service for the workflow.
//!
//! - [`PricingEngine`]: Non-binding price simulation
//! - [`QuotationController`]: Binding quote issuance
//! - [`ReservationController`]: Reservation and cancellation
//! - [`CatalogService`] / [`HistoryService`]: Read-only views
//! - [`InFlightGuard`]: One mutating call at a time

pub mod catalog;
pub mod history;
pub mod in_flight;
pub mod pricing;
pub mod quotation;
pub mod reservation;

pub use catalog::{Catalog, CatalogService};
pub use history::HistoryService;
pub use in_flight::{InFlightGuard, InFlightPermit};
pub use pricing::PricingEngine;
pub use quotation::QuotationController;
pub use reservation::{CancelOutcome, CancellationConfirmation, ReservationController};
