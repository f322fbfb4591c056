//! # Remote Service Port
//!
//! Port definition for the dealership's catalog, pricing, quotation and
//! reservation API.
//!
//! Every method is a single, complete remote transaction from the client's
//! point of view. Implementations perform no retries.
//!
//! # Examples
//!
//! ```ignore
//! use dealer_reservation::infrastructure::remote::traits::RemoteService;
//!
//! struct MyService { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl RemoteService for MyService {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::{
    Accessory, LineItem, Quote, Reservation, SimulationRequest, Vehicle,
};
use crate::domain::value_objects::{Money, QuoteId, ReservationId, VehicleStatus};
use crate::infrastructure::remote::error::ServiceResult;
use async_trait::async_trait;
use std::fmt;

/// Itemized price as reported by the server, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Total the server computed.
    pub total: Money,
    /// Lines in server order.
    pub lines: Vec<LineItem>,
}

/// Answer of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationReceipt {
    /// Human-readable outcome reported by the server.
    pub message: Option<String>,
}

/// Trait defining the remote dealership service.
///
/// # Errors
///
/// Every method returns `ServiceError`:
///
/// - `Unauthenticated` - no credential for an auth-required call, or the
///   server refused it
/// - `Transport` - the call never produced a response
/// - `RemoteRejected` - non-success status, with the server message
/// - `InvalidResponse` - the body broke the contract
#[async_trait]
pub trait RemoteService: Send + Sync + fmt::Debug {
    /// Lists catalog vehicles; `None` lists every status.
    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> ServiceResult<Vec<Vehicle>>;

    /// Lists catalog accessories.
    async fn list_accessories(&self) -> ServiceResult<Vec<Accessory>>;

    /// Prices a selection. No authentication, nothing persisted.
    async fn simulate(&self, request: &SimulationRequest) -> ServiceResult<PriceBreakdown>;

    /// Issues a binding quote for a selection. Requires authentication.
    ///
    /// Each call creates a new quote; repeated calls are never deduplicated.
    async fn issue_quote(&self, request: &SimulationRequest) -> ServiceResult<Quote>;

    /// Consumes a quote into an active reservation and charges the deposit.
    /// Requires authentication.
    async fn create_reservation(&self, quote_id: &QuoteId) -> ServiceResult<Reservation>;

    /// Cancels an active reservation. Requires authentication.
    ///
    /// A reservation that is no longer active is rejected with
    /// `RemoteRejected`.
    async fn cancel_reservation(&self, id: &ReservationId) -> ServiceResult<CancellationReceipt>;

    /// Lists the caller's quotes. Requires authentication.
    async fn list_quotes(&self) -> ServiceResult<Vec<Quote>>;

    /// Lists the caller's reservations. Requires authentication.
    async fn list_reservations(&self) -> ServiceResult<Vec<Reservation>>;
}
