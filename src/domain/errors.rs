//! # Domain Errors
//!
//! Error types raised by domain value objects and entities.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::errors::DomainError;
//! use dealer_reservation::domain::value_objects::WorkflowStage;
//!
//! let err = DomainError::InvalidStateTransition {
//!     from: WorkflowStage::Idle,
//!     to: WorkflowStage::Reserved,
//! };
//! assert!(err.to_string().contains("IDLE"));
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::workflow_stage::WorkflowStage;
use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A monetary amount violated its invariants (e.g. negative).
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A deposit rate outside `[0, 1]`.
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Generic validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A workflow stage transition that the state machine does not allow.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Stage the workflow was in.
        from: WorkflowStage,
        /// Stage that was requested.
        to: WorkflowStage,
    },

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_amount_display() {
        let err = DomainError::InvalidAmount("-1".to_string());
        assert_eq!(err.to_string(), "invalid amount: -1");
    }

    #[test]
    fn arithmetic_converts() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(matches!(err, DomainError::Arithmetic(ArithmeticError::Overflow)));
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn transition_display_names_both_stages() {
        let err = DomainError::InvalidStateTransition {
            from: WorkflowStage::Quoted,
            to: WorkflowStage::Cancelled,
        };
        let text = err.to_string();
        assert!(text.contains("QUOTED"));
        assert!(text.contains("CANCELLED"));
    }
}
