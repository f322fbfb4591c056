//! # Workflow State
//!
//! One variant per stage, each carrying exactly the data valid for it.
//! A simulation can only exist next to the selection it priced, and a
//! reservation never coexists with an editable selection.

use crate::application::error::{WorkflowAction, WorkflowError};
use crate::domain::entities::{Quote, Reservation, Selection, SimulationResult};
use crate::domain::value_objects::{Money, WorkflowStage};

/// Current state of a purchase workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// Composing a selection.
    Idle {
        /// Vehicle and accessories chosen so far.
        selection: Option<Selection>,
        /// Set when quote issuance stopped for sign-in; the selection is
        /// the memo to resume with.
        pending_quote: bool,
    },
    /// The selection was priced.
    Simulated {
        /// The priced selection.
        selection: Selection,
        /// Estimate for exactly `selection`.
        simulation: SimulationResult,
    },
    /// A binding quote was issued.
    Quoted {
        /// The quoted selection.
        selection: Selection,
        /// Estimate the quote was issued from; restored on back.
        simulation: SimulationResult,
        /// The issued quote.
        quote: Quote,
    },
    /// The quote became a reservation. The quote was consumed by it and is
    /// no longer held.
    Reserved {
        /// The active reservation.
        reservation: Reservation,
    },
    /// The reservation was cancelled.
    Cancelled {
        /// The cancelled reservation.
        reservation: Reservation,
    },
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Idle {
            selection: None,
            pending_quote: false,
        }
    }
}

impl WorkflowState {
    /// Returns the stage this state belongs to.
    #[must_use]
    pub fn stage(&self) -> WorkflowStage {
        match self {
            Self::Idle { .. } => WorkflowStage::Idle,
            Self::Simulated { .. } => WorkflowStage::Simulated,
            Self::Quoted { .. } => WorkflowStage::Quoted,
            Self::Reserved { .. } => WorkflowStage::Reserved,
            Self::Cancelled { .. } => WorkflowStage::Cancelled,
        }
    }

    /// Returns the live selection, if the stage has one.
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Idle { selection, .. } => selection.as_ref(),
            Self::Simulated { selection, .. } | Self::Quoted { selection, .. } => Some(selection),
            Self::Reserved { .. } | Self::Cancelled { .. } => None,
        }
    }

    /// Returns the current estimate, if any.
    #[must_use]
    pub fn simulation(&self) -> Option<&SimulationResult> {
        match self {
            Self::Simulated { simulation, .. } | Self::Quoted { simulation, .. } => {
                Some(simulation)
            }
            _ => None,
        }
    }

    /// Returns the current quote, if any.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Quoted { quote, .. } => Some(quote),
            _ => None,
        }
    }

    /// Returns the current reservation, if any.
    #[must_use]
    pub fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Reserved { reservation } | Self::Cancelled { reservation } => {
                Some(reservation)
            }
            _ => None,
        }
    }

    /// Returns true if issuance is waiting for sign-in.
    #[must_use]
    pub fn pending_quote(&self) -> bool {
        matches!(self, Self::Idle { pending_quote: true, .. })
    }
}

/// A failed action. The workflow stayed in `stage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFailure {
    /// Stage the workflow stayed in (or fell back to, for sign-in).
    pub stage: WorkflowStage,
    /// The action that failed.
    pub action: WorkflowAction,
    /// Why.
    pub error: WorkflowError,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    /// Current stage.
    pub stage: WorkflowStage,
    /// Live selection.
    pub selection: Option<Selection>,
    /// Estimate for the live selection.
    pub simulation: Option<SimulationResult>,
    /// Issued quote.
    pub quote: Option<Quote>,
    /// Reservation.
    pub reservation: Option<Reservation>,
    /// Deposit the user is about to pay, computed from the configured hint.
    /// Only set while quoted.
    pub deposit_preview: Option<Money>,
    /// True if issuance is waiting for sign-in.
    pub pending_quote: bool,
    /// Last failure since the last successful action.
    pub last_failure: Option<WorkflowFailure>,
    /// True while a mutating action is in flight.
    pub in_flight: bool,
}
