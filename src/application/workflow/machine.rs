//! # Workflow Machine
//!
//! Drives one purchase from selection to reservation.
//!
//! # Rules
//!
//! - Only the named actions move the state, and only along
//!   [`WorkflowStage::can_transition_to`]. An action called out of sequence
//!   is a [`WorkflowError::ContractViolation`] and never reaches the remote
//!   service.
//! - One mutating action at a time. Every action except [`Workflow::load_catalog`]
//!   and the read accessors is refused with [`WorkflowError::Busy`] while
//!   another is in flight.
//! - A failed action leaves the stage unchanged and is recorded as the
//!   last failure. The one exception is an unauthenticated quote issuance,
//!   which falls back to `Idle` and memoes the selection so
//!   [`Workflow::resume_after_sign_in`] can finish it.
//! - State is never locked across an await.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::application::workflow::Workflow;
//! use dealer_reservation::domain::entities::{Accessory, Vehicle};
//! use dealer_reservation::domain::value_objects::{
//!     AccessoryId, Money, VehicleId, VehicleStatus, WorkflowStage,
//! };
//! use dealer_reservation::infrastructure::remote::{
//!     AccessToken, InMemoryRemoteService, SessionCredentials,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let vehicle = Vehicle::new(
//!     VehicleId::new_v4(),
//!     "Corolla",
//!     "Toyota",
//!     Money::from_units(20000),
//!     VehicleStatus::Available,
//! );
//! let rack = Accessory::new(AccessoryId::new_v4(), "Roof rack", Money::from_units(500));
//! let session = Arc::new(SessionCredentials::with_token(AccessToken::new("buyer")));
//! let remote = InMemoryRemoteService::new(
//!     vec![vehicle.clone()],
//!     vec![rack.clone()],
//!     session.clone(),
//! );
//!
//! let workflow = Workflow::new(Arc::new(remote), session);
//! workflow.load_catalog(None).await.unwrap();
//! workflow.select_vehicle(vehicle.id()).unwrap();
//! workflow.toggle_accessory(rack.id()).unwrap();
//!
//! let estimate = workflow.simulate().await.unwrap();
//! assert_eq!(estimate.total(), Money::from_units(20500));
//!
//! let quote = workflow.issue_quote().await.unwrap();
//! assert!(quote.is_valid());
//! assert_eq!(workflow.stage(), WorkflowStage::Quoted);
//! # });
//! ```

use crate::application::error::{WorkflowAction, WorkflowError, WorkflowResult};
use crate::application::services::{
    CancelOutcome, CancellationConfirmation, Catalog, CatalogService, InFlightGuard,
    InFlightPermit, PricingEngine, QuotationController, ReservationController,
};
use crate::application::workflow::state::{WorkflowFailure, WorkflowSnapshot, WorkflowState};
use crate::config::ClientConfig;
use crate::domain::entities::{Quote, Reservation, Selection, SimulationResult};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    AccessoryId, DepositRate, VehicleId, VehicleStatus, WorkflowStage,
};
use crate::infrastructure::remote::credentials::CredentialProvider;
use crate::infrastructure::remote::error::ServiceResult;
use crate::infrastructure::remote::http_service::HttpRemoteService;
use crate::infrastructure::remote::traits::RemoteService;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct Inner {
    state: WorkflowState,
    last_failure: Option<WorkflowFailure>,
}

impl Inner {
    fn stage(&self) -> WorkflowStage {
        self.state.stage()
    }

    /// Moves to `next` and clears the last failure.
    fn transition(&mut self, action: WorkflowAction, next: WorkflowState) -> WorkflowResult<()> {
        let from = self.stage();
        let to = next.stage();
        if !from.can_transition_to(to) {
            return Err(self.fail(
                action,
                DomainError::InvalidStateTransition { from, to }.into(),
            ));
        }
        if from != to {
            info!(%action, %from, %to, "workflow stage changed");
        }
        self.state = next;
        self.last_failure = None;
        Ok(())
    }

    /// Records `error` against the current stage and hands it back.
    fn fail(&mut self, action: WorkflowAction, error: WorkflowError) -> WorkflowError {
        let stage = self.stage();
        if error.is_recoverable() {
            warn!(%action, %stage, error = %error, "workflow action failed");
        } else {
            error!(%action, %stage, error = %error, "workflow contract violated");
        }
        self.last_failure = Some(WorkflowFailure {
            stage,
            action,
            error: error.clone(),
        });
        error
    }

    fn violation(&mut self, action: WorkflowAction) -> WorkflowError {
        let stage = self.stage();
        debug!(%action, %stage, allowed = ?stage.valid_transitions(), "action out of stage");
        self.fail(action, WorkflowError::contract_violation(action, stage))
    }
}

/// A purchase workflow instance.
///
/// Shared by reference; every action takes `&self`.
#[derive(Debug)]
pub struct Workflow {
    pricing: PricingEngine,
    quotation: QuotationController,
    reservations: ReservationController,
    catalog_service: CatalogService,
    deposit_rate_hint: DepositRate,
    inner: Mutex<Inner>,
    catalog: RwLock<Catalog>,
    in_flight: InFlightGuard,
}

impl Workflow {
    /// Creates a workflow over `remote`.
    ///
    /// `credentials` is read before quote issuance; the workflow never
    /// writes it.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            pricing: PricingEngine::new(Arc::clone(&remote)),
            quotation: QuotationController::new(Arc::clone(&remote), credentials),
            reservations: ReservationController::new(Arc::clone(&remote)),
            catalog_service: CatalogService::new(remote),
            deposit_rate_hint: DepositRate::default(),
            inner: Mutex::new(Inner::default()),
            catalog: RwLock::new(Catalog::default()),
            in_flight: InFlightGuard::new(),
        }
    }

    /// Creates a workflow over the REST service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ServiceResult<Self> {
        let remote = HttpRemoteService::from_config(config, Arc::clone(&credentials))?;
        Ok(Self::new(Arc::new(remote), credentials).with_deposit_rate_hint(config.deposit_rate_hint))
    }

    /// Sets the rate used for the deposit preview.
    #[must_use]
    pub fn with_deposit_rate_hint(mut self, rate: DepositRate) -> Self {
        self.deposit_rate_hint = rate;
        self
    }

    /// Returns the rate used for the deposit preview.
    #[inline]
    #[must_use]
    pub fn deposit_rate_hint(&self) -> DepositRate {
        self.deposit_rate_hint
    }

    // ---- reads -------------------------------------------------------------

    /// Returns the current stage.
    #[must_use]
    pub fn stage(&self) -> WorkflowStage {
        self.inner.lock().stage()
    }

    /// Returns the last failure since the last successful action.
    #[must_use]
    pub fn last_failure(&self) -> Option<WorkflowFailure> {
        self.inner.lock().last_failure.clone()
    }

    /// Returns a copy of the loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.catalog.read().clone()
    }

    /// Returns true while a mutating action is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Returns everything the presentation layer renders.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.inner.lock();
        let state = &inner.state;
        let deposit_preview = match state {
            WorkflowState::Quoted { quote, .. } => {
                quote.deposit_preview(self.deposit_rate_hint).ok()
            }
            _ => None,
        };
        WorkflowSnapshot {
            stage: state.stage(),
            selection: state.selection().cloned(),
            simulation: state.simulation().cloned(),
            quote: state.quote().cloned(),
            reservation: state.reservation().cloned(),
            deposit_preview,
            pending_quote: state.pending_quote(),
            last_failure: inner.last_failure.clone(),
            in_flight: self.in_flight.is_busy(),
        }
    }

    /// Loads vehicles with `status` and all accessories into the catalog.
    ///
    /// A read: it runs alongside other actions and never changes the stage.
    ///
    /// # Errors
    ///
    /// `WorkflowError::Service` if either read fails; the previous catalog
    /// is kept.
    pub async fn load_catalog(&self, status: Option<VehicleStatus>) -> WorkflowResult<()> {
        let catalog = self.catalog_service.load(status).await?;
        *self.catalog.write() = catalog;
        Ok(())
    }

    // ---- selection edits ---------------------------------------------------

    /// Chooses the vehicle to price, starting a fresh accessory set.
    ///
    /// Reselecting the current vehicle changes nothing.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` once a quote exists
    /// - `UnknownVehicle` if the vehicle is not in the loaded catalog
    /// - `VehicleUnavailable` if it cannot be quoted
    pub fn select_vehicle(&self, id: VehicleId) -> WorkflowResult<()> {
        let action = WorkflowAction::SelectVehicle;
        let _permit = self.acquire(action)?;
        let vehicle = self.catalog.read().find_vehicle(&id).cloned();

        let mut inner = self.inner.lock();
        if !inner.stage().allows_selection_edit() {
            return Err(inner.violation(action));
        }
        let Some(vehicle) = vehicle else {
            return Err(inner.fail(action, WorkflowError::UnknownVehicle(id)));
        };
        if !vehicle.is_available() {
            return Err(inner.fail(action, WorkflowError::VehicleUnavailable(id)));
        }
        if inner.state.selection().is_some_and(|s| s.vehicle().id() == id) {
            inner.last_failure = None;
            return Ok(());
        }

        inner.transition(
            action,
            WorkflowState::Idle {
                selection: Some(Selection::new(vehicle)),
                pending_quote: false,
            },
        )
    }

    /// Adds or removes an accessory. Returns true if it is selected after.
    ///
    /// Any edit drops the current estimate and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` once a quote exists
    /// - `NoSelection` before a vehicle is selected
    /// - `UnknownAccessory` if the accessory is not in the loaded catalog
    pub fn toggle_accessory(&self, id: AccessoryId) -> WorkflowResult<bool> {
        let action = WorkflowAction::ToggleAccessory;
        let _permit = self.acquire(action)?;
        let known = self.catalog.read().find_accessory(&id).is_some();

        let mut inner = self.inner.lock();
        if !inner.stage().allows_selection_edit() {
            return Err(inner.violation(action));
        }
        let Some(mut selection) = inner.state.selection().cloned() else {
            return Err(inner.fail(action, WorkflowError::NoSelection));
        };
        if !known {
            return Err(inner.fail(action, WorkflowError::UnknownAccessory(id)));
        }

        let selected = selection.toggle_accessory(id);
        inner.transition(
            action,
            WorkflowState::Idle {
                selection: Some(selection),
                pending_quote: false,
            },
        )?;
        Ok(selected)
    }

    // ---- remote actions ----------------------------------------------------

    /// Prices the live selection. `Idle` → `Simulated`.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `NoSelection` before a vehicle is selected
    /// - `ContractViolation` outside `Idle`
    /// - `Service` if pricing fails; the stage stays `Idle`
    pub async fn simulate(&self) -> WorkflowResult<SimulationResult> {
        let action = WorkflowAction::Simulate;
        let _permit = self.acquire(action)?;
        self.run_simulation(action).await
    }

    /// Issues a quote for the priced selection. `Simulated` → `Quoted`.
    ///
    /// Without a credential nothing is sent: the workflow falls back to
    /// `Idle` with the selection memoed and returns
    /// `Service(Unauthenticated)`.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` outside `Simulated`
    /// - `Service` if issuance fails
    pub async fn issue_quote(&self) -> WorkflowResult<Quote> {
        let action = WorkflowAction::IssueQuote;
        let _permit = self.acquire(action)?;
        self.run_issuance(action).await
    }

    /// Re-prices the memoed selection and issues its quote.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` unless issuance is waiting for sign-in
    /// - `Service` if pricing or issuance fails
    pub async fn resume_after_sign_in(&self) -> WorkflowResult<Quote> {
        let action = WorkflowAction::ResumeAfterSignIn;
        let _permit = self.acquire(action)?;
        {
            let mut inner = self.inner.lock();
            if !inner.state.pending_quote() {
                return Err(inner.violation(action));
            }
        }
        self.run_simulation(action).await?;
        self.run_issuance(action).await
    }

    /// Turns the quote into a reservation. `Quoted` → `Reserved`.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` outside `Quoted`
    /// - `Service` if the reservation fails, e.g. the quote is stale; the
    ///   stage stays `Quoted` and the quote is left as last observed
    pub async fn reserve(&self) -> WorkflowResult<Reservation> {
        let action = WorkflowAction::Reserve;
        let _permit = self.acquire(action)?;
        let quote = {
            let mut inner = self.inner.lock();
            match &inner.state {
                WorkflowState::Quoted { quote, .. } => quote.clone(),
                _ => return Err(inner.violation(action)),
            }
        };

        match self.reservations.reserve(&quote.id()).await {
            Ok(reservation) => {
                self.inner.lock().transition(
                    action,
                    WorkflowState::Reserved {
                        reservation: reservation.clone(),
                    },
                )?;
                Ok(reservation)
            }
            Err(e) => Err(self.inner.lock().fail(action, e.into())),
        }
    }

    /// Cancels the reservation. `Reserved` → `Cancelled`.
    ///
    /// Cancelling again from `Cancelled` is answered locally with
    /// [`CancelOutcome::AlreadyCancelled`].
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` outside `Reserved` and `Cancelled`
    /// - `Service` if cancellation fails; the stage stays `Reserved`
    pub async fn cancel(
        &self,
        confirmation: CancellationConfirmation,
    ) -> WorkflowResult<CancelOutcome> {
        let action = WorkflowAction::Cancel;
        let _permit = self.acquire(action)?;
        let mut reservation = {
            let mut inner = self.inner.lock();
            match &inner.state {
                WorkflowState::Reserved { reservation } => reservation.clone(),
                WorkflowState::Cancelled { .. } => {
                    inner.last_failure = None;
                    return Ok(CancelOutcome::AlreadyCancelled);
                }
                _ => return Err(inner.violation(action)),
            }
        };

        let outcome = match self
            .reservations
            .cancel(&reservation.id(), confirmation)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.inner.lock().fail(action, e.into())),
        };

        let mut inner = self.inner.lock();
        if let Err(e) = reservation.mark_cancelled() {
            return Err(inner.fail(action, e.into()));
        }
        inner.transition(action, WorkflowState::Cancelled { reservation })?;
        Ok(outcome)
    }

    // ---- navigation --------------------------------------------------------

    /// Steps back one stage, keeping the selection.
    ///
    /// `Simulated` → `Idle` drops the estimate; `Quoted` → `Simulated` drops
    /// the quote locally.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` from `Idle`, `Reserved` or `Cancelled`
    pub fn back(&self) -> WorkflowResult<WorkflowStage> {
        let action = WorkflowAction::Back;
        let _permit = self.acquire(action)?;
        let mut inner = self.inner.lock();

        let previous = match &inner.state {
            WorkflowState::Simulated { selection, .. } => WorkflowState::Idle {
                selection: Some(selection.clone()),
                pending_quote: false,
            },
            WorkflowState::Quoted {
                selection,
                simulation,
                ..
            } => WorkflowState::Simulated {
                selection: selection.clone(),
                simulation: simulation.clone(),
            },
            _ => return Err(inner.violation(action)),
        };
        inner.transition(action, previous)?;
        Ok(inner.stage())
    }

    /// Starts over with an empty selection from `Idle`, `Simulated` or
    /// `Cancelled`.
    ///
    /// A held quote is left with [`back`](Self::back) and an active
    /// reservation must be cancelled first, so the workflow never drops the
    /// only handle to either.
    ///
    /// # Errors
    ///
    /// - `Busy` while another action is in flight
    /// - `ContractViolation` from `Quoted` or `Reserved`
    pub fn reset(&self) -> WorkflowResult<()> {
        let action = WorkflowAction::Reset;
        let _permit = self.acquire(action)?;
        let mut inner = self.inner.lock();
        if !inner.stage().can_transition_to(WorkflowStage::Idle) {
            return Err(inner.violation(action));
        }
        inner.transition(action, WorkflowState::default())
    }

    // ---- internals ---------------------------------------------------------

    fn acquire(&self, action: WorkflowAction) -> WorkflowResult<InFlightPermit<'_>> {
        self.in_flight.try_acquire().ok_or_else(|| {
            warn!(%action, "rejected: another action is in flight");
            WorkflowError::busy(action)
        })
    }

    /// Prices the `Idle` selection. The caller holds the permit.
    async fn run_simulation(&self, action: WorkflowAction) -> WorkflowResult<SimulationResult> {
        let selection = {
            let mut inner = self.inner.lock();
            match &inner.state {
                WorkflowState::Idle {
                    selection: Some(selection),
                    ..
                } => selection.clone(),
                WorkflowState::Idle { selection: None, .. } => {
                    return Err(inner.fail(action, WorkflowError::NoSelection));
                }
                _ => return Err(inner.violation(action)),
            }
        };

        match self.pricing.simulate(&selection).await {
            Ok(simulation) => {
                self.inner.lock().transition(
                    action,
                    WorkflowState::Simulated {
                        selection,
                        simulation: simulation.clone(),
                    },
                )?;
                Ok(simulation)
            }
            Err(e) => Err(self.inner.lock().fail(action, e.into())),
        }
    }

    /// Issues a quote for the `Simulated` selection. The caller holds the
    /// permit.
    async fn run_issuance(&self, action: WorkflowAction) -> WorkflowResult<Quote> {
        let (selection, simulation) = {
            let mut inner = self.inner.lock();
            match &inner.state {
                WorkflowState::Simulated {
                    selection,
                    simulation,
                } if simulation.matches(selection) => (selection.clone(), simulation.clone()),
                _ => return Err(inner.violation(action)),
            }
        };

        match self.quotation.issue_quote(&selection).await {
            Ok(quote) => {
                self.inner.lock().transition(
                    action,
                    WorkflowState::Quoted {
                        selection,
                        simulation,
                        quote: quote.clone(),
                    },
                )?;
                Ok(quote)
            }
            Err(e) if e.is_unauthenticated() => {
                let mut inner = self.inner.lock();
                inner.transition(
                    action,
                    WorkflowState::Idle {
                        selection: Some(selection),
                        pending_quote: true,
                    },
                )?;
                Err(inner.fail(action, e.into()))
            }
            Err(e) => Err(self.inner.lock().fail(action, e.into())),
        }
    }
}
