//! # In-Memory Remote Service
//!
//! In-process implementation of [`RemoteService`] for tests and demos.
//!
//! It reproduces the dealership server's observable rules:
//! - simulation prices come from the seeded catalog;
//! - issuing a quote requires a credential, invalidates the caller's earlier
//!   valid quotes that have no active reservation, and expires after 48 h;
//! - a reservation needs a valid, unexpired, unreserved quote, charges the
//!   server-owned deposit rate, holds the vehicle for 7 days and extends the
//!   quote's expiry to match;
//! - cancelling anything but an active reservation is rejected, and a
//!   successful cancellation frees the vehicle.
//!
//! Every call that passes the credential check is counted, which lets tests
//! assert how many requests "reached the network".

use crate::domain::entities::{
    Accessory, LineItem, Quote, Reservation, SimulationRequest, Vehicle,
};
use crate::domain::value_objects::{
    DepositRate, Money, QuoteId, ReservationId, Timestamp, VehicleId, VehicleStatus,
};
use crate::infrastructure::remote::credentials::CredentialProvider;
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::operation::Operation;
use crate::infrastructure::remote::traits::{CancellationReceipt, PriceBreakdown, RemoteService};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Hours a freshly issued quote stays redeemable.
pub const QUOTE_VALIDITY_HOURS: i64 = 48;

/// Days a reservation holds the vehicle.
pub const RESERVATION_HOLD_DAYS: i64 = 7;

/// Message returned when cancelling a reservation that is not active.
pub const RESERVATION_NOT_ACTIVE: &str = "reservation not active";

#[derive(Debug, Clone)]
struct QuoteRecord {
    id: QuoteId,
    owner: String,
    created_at: Timestamp,
    expires_at: Timestamp,
    valid: bool,
    final_amount: Money,
    lines: Vec<LineItem>,
    vehicle_id: VehicleId,
}

impl QuoteRecord {
    fn is_redeemable(&self) -> bool {
        self.valid && !self.expires_at.is_expired()
    }

    fn to_quote(&self) -> Quote {
        Quote::builder(self.id, self.final_amount)
            .created_at(self.created_at)
            .expires_at(self.expires_at)
            .valid(self.valid)
            .lines(self.lines.clone())
            .build()
    }
}

#[derive(Debug, Clone)]
struct ReservationRecord {
    owner: String,
    reservation: Reservation,
}

#[derive(Debug, Default)]
struct ServerState {
    vehicles: Vec<Vehicle>,
    accessories: Vec<Accessory>,
    quotes: Vec<QuoteRecord>,
    reservations: Vec<ReservationRecord>,
}

impl ServerState {
    fn vehicle(&self, id: &VehicleId) -> ServiceResult<&Vehicle> {
        self.vehicles
            .iter()
            .find(|v| v.id() == *id)
            .ok_or_else(not_found)
    }

    fn set_vehicle_status(&mut self, id: &VehicleId, status: VehicleStatus) {
        if let Some(slot) = self.vehicles.iter_mut().find(|v| v.id() == *id) {
            *slot = slot.clone().with_status(status);
        }
    }

    fn reservation_for(&self, quote_id: &QuoteId) -> Option<&Reservation> {
        self.reservations
            .iter()
            .map(|r| &r.reservation)
            .find(|r| r.quote_id() == *quote_id)
    }

    fn price(&self, request: &SimulationRequest) -> ServiceResult<PriceBreakdown> {
        let vehicle = self.vehicle(&request.vehicle_id)?;
        let mut lines = vec![LineItem::vehicle(
            vehicle.id(),
            vehicle.display_name(),
            vehicle.price(),
        )];
        for id in request.accessory_ids.iter() {
            let accessory = self
                .accessories
                .iter()
                .find(|a| a.id() == *id)
                .ok_or_else(not_found)?;
            lines.push(LineItem::accessory(
                accessory.id(),
                accessory.name(),
                accessory.price(),
            ));
        }
        let total = Money::checked_sum(lines.iter().map(LineItem::amount))
            .map_err(|e| ServiceError::rejected(500, e.to_string()))?;
        Ok(PriceBreakdown { total, lines })
    }
}

fn not_found() -> ServiceError {
    ServiceError::rejected(404, "Not found.")
}

fn bad_request(message: &str) -> ServiceError {
    ServiceError::rejected(400, message)
}

/// In-memory implementation of [`RemoteService`].
///
/// Clones share state, counters and injected failures.
#[derive(Debug, Clone)]
pub struct InMemoryRemoteService {
    state: Arc<RwLock<ServerState>>,
    credentials: Arc<dyn CredentialProvider>,
    calls: Arc<parking_lot::Mutex<HashMap<&'static str, usize>>>,
    mutating_calls: Arc<AtomicUsize>,
    failures: Arc<parking_lot::Mutex<HashMap<&'static str, VecDeque<ServiceError>>>>,
    latency: Option<Duration>,
    deposit_rate: DepositRate,
}

impl InMemoryRemoteService {
    /// Creates a service seeded with a catalog.
    #[must_use]
    pub fn new(
        vehicles: Vec<Vehicle>,
        accessories: Vec<Accessory>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ServerState {
                vehicles,
                accessories,
                ..ServerState::default()
            })),
            credentials,
            calls: Arc::default(),
            mutating_calls: Arc::default(),
            failures: Arc::default(),
            latency: None,
            deposit_rate: DepositRate::default(),
        }
    }

    /// Delays every counted call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Sets the server-owned deposit rate.
    #[must_use]
    pub fn with_deposit_rate(mut self, rate: DepositRate) -> Self {
        self.deposit_rate = rate;
        self
    }

    /// Returns the server-owned deposit rate.
    #[inline]
    #[must_use]
    pub fn deposit_rate(&self) -> DepositRate {
        self.deposit_rate
    }

    /// Makes the next call to `operation` fail with `error`.
    ///
    /// `operation` is an [`Operation::name`]. Failures queue up in order.
    pub fn fail_next(&self, operation: &'static str, error: ServiceError) {
        self.failures
            .lock()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Returns how many calls to `operation` reached the service.
    #[must_use]
    pub fn calls(&self, operation: &'static str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    /// Returns how many calls that change remote state reached the service.
    #[must_use]
    pub fn mutating_calls(&self) -> usize {
        self.mutating_calls.load(Ordering::SeqCst)
    }

    /// Returns how many calls of any kind reached the service.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Flips a quote's validity flag to false, as the server does on expiry.
    pub async fn invalidate_quote(&self, id: &QuoteId) -> bool {
        let mut state = self.state.write().await;
        match state.quotes.iter_mut().find(|q| q.id == *id) {
            Some(record) => {
                record.valid = false;
                true
            }
            None => false,
        }
    }

    /// Returns the number of quotes issued so far.
    pub async fn quote_count(&self) -> usize {
        self.state.read().await.quotes.len()
    }

    /// Returns a vehicle's current status.
    pub async fn vehicle_status(&self, id: &VehicleId) -> Option<VehicleStatus> {
        let state = self.state.read().await;
        state.vehicle(id).ok().map(Vehicle::status)
    }

    /// Returns the server-side state of a reservation.
    pub async fn reservation(&self, id: &ReservationId) -> Option<Reservation> {
        let state = self.state.read().await;
        state
            .reservations
            .iter()
            .find(|r| r.reservation.id() == *id)
            .map(|r| r.reservation.clone())
    }

    /// Gates a call: checks the credential, counts the call, applies latency
    /// and injected failures. Returns the caller identity.
    async fn enter(&self, operation: &Operation) -> ServiceResult<Option<String>> {
        let owner = match self.credentials.credential() {
            Some(token) => Some(token.expose().to_string()),
            None if operation.requires_auth() => return Err(ServiceError::Unauthenticated),
            None => None,
        };

        *self.calls.lock().entry(operation.name()).or_default() += 1;
        if operation.is_mutating() {
            self.mutating_calls.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let injected = self
            .failures
            .lock()
            .get_mut(operation.name())
            .and_then(VecDeque::pop_front);
        match injected {
            Some(error) => {
                debug!(
                    operation = operation.name(),
                    mutating = operation.is_mutating(),
                    error = %error,
                    "injected failure"
                );
                Err(error)
            }
            None => Ok(owner),
        }
    }

    async fn enter_authenticated(&self, operation: &Operation) -> ServiceResult<String> {
        self.enter(operation)
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }
}

#[async_trait]
impl RemoteService for InMemoryRemoteService {
    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> ServiceResult<Vec<Vehicle>> {
        self.enter(&Operation::ListVehicles { status }).await?;
        let state = self.state.read().await;
        Ok(state
            .vehicles
            .iter()
            .filter(|v| status.is_none_or(|s| v.status() == s))
            .cloned()
            .collect())
    }

    async fn list_accessories(&self) -> ServiceResult<Vec<Accessory>> {
        self.enter(&Operation::ListAccessories).await?;
        Ok(self.state.read().await.accessories.clone())
    }

    async fn simulate(&self, request: &SimulationRequest) -> ServiceResult<PriceBreakdown> {
        self.enter(&Operation::Simulate).await?;
        self.state.read().await.price(request)
    }

    async fn issue_quote(&self, request: &SimulationRequest) -> ServiceResult<Quote> {
        let owner = self.enter_authenticated(&Operation::IssueQuote).await?;
        let mut state = self.state.write().await;
        let breakdown = state.price(request)?;

        let superseded: Vec<QuoteId> = state
            .quotes
            .iter()
            .filter(|q| q.owner == owner && q.valid)
            .map(|q| q.id)
            .filter(|id| !state.reservation_for(id).is_some_and(Reservation::is_active))
            .collect();
        for record in state.quotes.iter_mut() {
            if superseded.contains(&record.id) {
                record.valid = false;
            }
        }

        let now = Timestamp::now();
        let record = QuoteRecord {
            id: QuoteId::new_v4(),
            owner,
            created_at: now,
            expires_at: now.add_hours(QUOTE_VALIDITY_HOURS),
            valid: true,
            final_amount: breakdown.total,
            lines: breakdown.lines,
            vehicle_id: request.vehicle_id,
        };
        let quote = record.to_quote();
        state.quotes.push(record);
        Ok(quote)
    }

    async fn create_reservation(&self, quote_id: &QuoteId) -> ServiceResult<Reservation> {
        let owner = self
            .enter_authenticated(&Operation::CreateReservation)
            .await?;
        let mut state = self.state.write().await;

        let record = state
            .quotes
            .iter()
            .find(|q| q.id == *quote_id && q.owner == owner)
            .cloned()
            .ok_or_else(not_found)?;
        if state.reservation_for(quote_id).is_some() {
            return Err(bad_request("quote already has a reservation"));
        }
        if !record.is_redeemable() {
            return Err(bad_request("quote expired"));
        }

        let deposit = record
            .final_amount
            .safe_mul_rate(self.deposit_rate)
            .map_err(|e| ServiceError::rejected(500, e.to_string()))?;
        let now = Timestamp::now();
        let expires_at = now.add_days(RESERVATION_HOLD_DAYS);
        let payment = Uuid::new_v4().simple().to_string().to_uppercase();
        let reservation = Reservation::builder(ReservationId::new_v4(), *quote_id)
            .number(Uuid::new_v4().to_string())
            .deposit(deposit)
            .created_at(now)
            .expires_at(expires_at)
            .payment_number(format!("PAY-{}", payment.get(..8).unwrap_or(&payment)))
            .build();

        if let Some(quote) = state.quotes.iter_mut().find(|q| q.id == *quote_id) {
            quote.valid = false;
            quote.expires_at = expires_at;
        }
        state.set_vehicle_status(&record.vehicle_id, VehicleStatus::Reserved);
        state.reservations.push(ReservationRecord {
            owner,
            reservation: reservation.clone(),
        });
        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: &ReservationId) -> ServiceResult<CancellationReceipt> {
        let owner = self
            .enter_authenticated(&Operation::CancelReservation { id: *id })
            .await?;
        let mut state = self.state.write().await;

        let record = state
            .reservations
            .iter_mut()
            .find(|r| r.reservation.id() == *id && r.owner == owner)
            .ok_or_else(not_found)?;
        if !record.reservation.is_active() {
            return Err(bad_request(RESERVATION_NOT_ACTIVE));
        }
        record
            .reservation
            .mark_cancelled()
            .map_err(|e| ServiceError::rejected(500, e.to_string()))?;
        let quote_id = record.reservation.quote_id();

        let vehicle = state
            .quotes
            .iter()
            .find(|q| q.id == quote_id)
            .map(|q| q.vehicle_id);
        if let Some(vehicle) = vehicle {
            state.set_vehicle_status(&vehicle, VehicleStatus::Available);
        }
        Ok(CancellationReceipt {
            message: Some("reservation cancelled and deposit refunded".to_string()),
        })
    }

    async fn list_quotes(&self) -> ServiceResult<Vec<Quote>> {
        let owner = self.enter_authenticated(&Operation::ListQuotes).await?;
        let state = self.state.read().await;
        Ok(state
            .quotes
            .iter()
            .rev()
            .filter(|q| q.owner == owner)
            .map(QuoteRecord::to_quote)
            .collect())
    }

    async fn list_reservations(&self) -> ServiceResult<Vec<Reservation>> {
        let owner = self
            .enter_authenticated(&Operation::ListReservations)
            .await?;
        let state = self.state.read().await;
        Ok(state
            .reservations
            .iter()
            .rev()
            .filter(|r| r.owner == owner)
            .map(|r| r.reservation.clone())
            .collect())
    }
}
