//! # Dealer Reservation
//!
//! Client-side core of a vehicle dealership's purchase flow: price a
//! vehicle with accessories, turn the estimate into a binding quote, secure
//! the quote with a deposit reservation and, if needed, cancel it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ application                                  │
//! │   workflow::Workflow  (stage machine)        │
//! │   services::{PricingEngine,                  │
//! │              QuotationController,            │
//! │              ReservationController, ...}     │
//! ├──────────────────────────────────────────────┤
//! │ domain                                       │
//! │   entities, value objects, WorkflowStage     │
//! ├──────────────────────────────────────────────┤
//! │ infrastructure::remote                       │
//! │   RemoteService port                         │
//! │   HttpRemoteService / InMemoryRemoteService  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The remote dealership service owns every persisted record, the
//! authoritative prices and the deposit rate. This crate sequences calls
//! to it, validates what comes back and keeps the workflow from skipping a
//! stage or submitting twice.
//!
//! # Feature Flags
//!
//! - `cli`: builds the `dealer-reservation` command-line binary

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::workflow::Workflow;
pub use config::ClientConfig;
