//! # Domain Entities
//!
//! Catalog items, the in-flight selection and the remote-owned projections
//! the purchase workflow carries between stages.
//!
//! ## Catalog
//!
//! - [`Vehicle`]: A sellable unit
//! - [`Accessory`]: An optional add-on
//!
//! ## Workflow Subjects
//!
//! - [`Selection`]: Vehicle plus chosen accessories
//! - [`SimulationResult`]: Non-binding itemized estimate
//! - [`Quote`]: Binding, time-limited price commitment
//! - [`Reservation`]: Deposit-secured hold on a vehicle

pub mod accessory;
pub mod quote;
pub mod reservation;
pub mod selection;
pub mod simulation;
pub mod vehicle;

pub use accessory::Accessory;
pub use quote::{Quote, QuoteBuilder};
pub use reservation::{Reservation, ReservationBuilder};
pub use selection::{AccessorySelection, Selection, SimulationRequest};
pub use simulation::{LineItem, LineKind, SimulationResult};
pub use vehicle::Vehicle;
