//! # Workflow Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! WorkflowError
//! ├── Service(ServiceError)    - Remote call failed (recoverable)
//! ├── Busy                     - Another action is in flight (recoverable)
//! ├── VehicleUnavailable       - Vehicle cannot be quoted (recoverable)
//! ├── ContractViolation        - Action called out of sequence
//! ├── NoSelection              - Action needs a selected vehicle
//! ├── UnknownVehicle           - Id not in the loaded catalog
//! ├── UnknownAccessory         - Id not in the loaded catalog
//! └── Domain(DomainError)      - Domain invariant broken
//! ```
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::application::error::{WorkflowAction, WorkflowError};
//! use dealer_reservation::domain::value_objects::WorkflowStage;
//! use dealer_reservation::infrastructure::remote::ServiceError;
//!
//! let err: WorkflowError = ServiceError::Unauthenticated.into();
//! assert!(err.is_recoverable());
//! assert!(err.requires_sign_in());
//!
//! let err = WorkflowError::contract_violation(WorkflowAction::Reserve, WorkflowStage::Idle);
//! assert!(!err.is_recoverable());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AccessoryId, VehicleId, WorkflowStage};
use crate::infrastructure::remote::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A named workflow action, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Choose the vehicle to price.
    SelectVehicle,
    /// Add or remove an accessory.
    ToggleAccessory,
    /// Price the selection.
    Simulate,
    /// Turn the simulation into a quote.
    IssueQuote,
    /// Re-simulate and issue the memoed selection after sign-in.
    ResumeAfterSignIn,
    /// Turn the quote into a reservation.
    Reserve,
    /// Cancel the reservation.
    Cancel,
    /// Step back one stage.
    Back,
    /// Start over.
    Reset,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SelectVehicle => "select_vehicle",
            Self::ToggleAccessory => "toggle_accessory",
            Self::Simulate => "simulate",
            Self::IssueQuote => "issue_quote",
            Self::ResumeAfterSignIn => "resume_after_sign_in",
            Self::Reserve => "reserve",
            Self::Cancel => "cancel",
            Self::Back => "back",
            Self::Reset => "reset",
        };
        write!(f, "{s}")
    }
}

/// Application layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A remote call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The action is not permitted in the current stage.
    #[error("{action} is not permitted in stage {stage}")]
    ContractViolation {
        /// The rejected action.
        action: WorkflowAction,
        /// Stage at the time of the call.
        stage: WorkflowStage,
    },

    /// Another mutating action is still in flight.
    #[error("{action} rejected: another action is in flight")]
    Busy {
        /// The rejected action.
        action: WorkflowAction,
    },

    /// The action needs a selected vehicle.
    #[error("no vehicle selected")]
    NoSelection,

    /// The vehicle is not in the loaded catalog.
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    /// The vehicle exists but cannot be quoted.
    #[error("vehicle {0} is not available")]
    VehicleUnavailable(VehicleId),

    /// The accessory is not in the loaded catalog.
    #[error("unknown accessory {0}")]
    UnknownAccessory(AccessoryId),

    /// A domain invariant was broken.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl WorkflowError {
    /// Creates a contract violation error.
    #[must_use]
    pub fn contract_violation(action: WorkflowAction, stage: WorkflowStage) -> Self {
        Self::ContractViolation { action, stage }
    }

    /// Creates a busy error.
    #[must_use]
    pub fn busy(action: WorkflowAction) -> Self {
        Self::Busy { action }
    }

    /// Returns true if the user can recover by retrying, stepping back or
    /// signing in.
    ///
    /// Contract violations and unknown ids are programming errors.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Service(_) | Self::Busy { .. } | Self::VehicleUnavailable(_)
        )
    }

    /// Returns true if the caller should route to sign-in.
    #[must_use]
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::Service(e) if e.is_unauthenticated())
    }

    /// Returns true for a contract violation.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// Returns the underlying service error, if any.
    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for workflow actions.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
