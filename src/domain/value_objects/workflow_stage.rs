//! # Workflow Stage
//!
//! Stages of the simulate → quote → reserve → cancel purchase workflow.
//!
//! # State Machine
//!
//! ```text
//! Idle ──simulate──▶ Simulated ──issue quote──▶ Quoted ──reserve──▶ Reserved ──cancel──▶ Cancelled
//!  ▲ ▲                 │  ▲                        │                                         │
//!  │ └─edit/back/reset─┘  └─────────back───────────┘                                         │
//!  └──────────────────────────────────────── reset ──────────────────────────────────────────┘
//! ```
//!
//! Selection edits in `Idle` stay in `Idle`. No transition skips a stage. Once a
//! reservation exists the only way back to `Idle` is through `Cancelled`.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::value_objects::WorkflowStage;
//!
//! let stage = WorkflowStage::Idle;
//! assert!(stage.can_transition_to(WorkflowStage::Simulated));
//! assert!(!stage.can_transition_to(WorkflowStage::Reserved));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the purchase workflow.
///
/// Transitions are enforced via [`can_transition_to`](WorkflowStage::can_transition_to).
///
/// # Terminal Stages
///
/// - [`Cancelled`](WorkflowStage::Cancelled): the reservation was cancelled and only a
///   reset to [`Idle`](WorkflowStage::Idle) leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStage {
    /// Choosing a vehicle and accessories; nothing priced yet.
    #[default]
    Idle,

    /// A non-binding estimate exists for the live selection.
    Simulated,

    /// A binding, time-limited quote was issued.
    Quoted,

    /// The quote was converted into a deposit-secured reservation.
    Reserved,

    /// The reservation was cancelled (terminal).
    Cancelled,
}

impl WorkflowStage {
    /// All stages, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Simulated,
        Self::Quoted,
        Self::Reserved,
        Self::Cancelled,
    ];

    /// Returns true if this is a terminal stage.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if this stage can transition to the target stage.
    ///
    /// - Idle → Idle (selection edit, reset), Simulated
    /// - Simulated → Idle (selection edit, back, reset), Quoted
    /// - Quoted → Simulated (back), Reserved
    /// - Reserved → Cancelled
    /// - Cancelled → Idle (reset)
    ///
    /// # Examples
    ///
    /// ```
    /// use dealer_reservation::domain::value_objects::WorkflowStage;
    ///
    /// assert!(WorkflowStage::Quoted.can_transition_to(WorkflowStage::Simulated));
    /// assert!(!WorkflowStage::Simulated.can_transition_to(WorkflowStage::Reserved));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Idle)
                | (Self::Idle, Self::Simulated)
                | (Self::Simulated, Self::Idle)
                | (Self::Simulated, Self::Quoted)
                | (Self::Quoted, Self::Simulated)
                | (Self::Quoted, Self::Reserved)
                | (Self::Reserved, Self::Cancelled)
                | (Self::Cancelled, Self::Idle)
        )
    }

    /// Returns the valid next stages from this stage.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }

    /// Returns true if the accessory selection may be edited in this stage.
    #[inline]
    #[must_use]
    pub const fn allows_selection_edit(&self) -> bool {
        matches!(self, Self::Idle | Self::Simulated)
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Simulated => "SIMULATED",
            Self::Quoted => "QUOTED",
            Self::Reserved => "RESERVED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod terminal {
        use super::*;

        #[test]
        fn only_cancelled_is_terminal() {
            for stage in WorkflowStage::ALL {
                assert_eq!(stage.is_terminal(), stage == WorkflowStage::Cancelled);
            }
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn forward_chain() {
            assert!(WorkflowStage::Idle.can_transition_to(WorkflowStage::Simulated));
            assert!(WorkflowStage::Simulated.can_transition_to(WorkflowStage::Quoted));
            assert!(WorkflowStage::Quoted.can_transition_to(WorkflowStage::Reserved));
            assert!(WorkflowStage::Reserved.can_transition_to(WorkflowStage::Cancelled));
        }

        #[test]
        fn backward_edges() {
            assert!(WorkflowStage::Simulated.can_transition_to(WorkflowStage::Idle));
            assert!(WorkflowStage::Quoted.can_transition_to(WorkflowStage::Simulated));
        }

        #[test]
        fn no_stage_is_skipped() {
            assert!(!WorkflowStage::Idle.can_transition_to(WorkflowStage::Quoted));
            assert!(!WorkflowStage::Idle.can_transition_to(WorkflowStage::Reserved));
            assert!(!WorkflowStage::Idle.can_transition_to(WorkflowStage::Cancelled));
            assert!(!WorkflowStage::Simulated.can_transition_to(WorkflowStage::Reserved));
            assert!(!WorkflowStage::Quoted.can_transition_to(WorkflowStage::Cancelled));
        }

        #[test]
        fn cancelled_only_resets() {
            assert_eq!(
                WorkflowStage::Cancelled.valid_transitions(),
                vec![WorkflowStage::Idle]
            );
        }

        #[test]
        fn reserved_cannot_go_back_to_quoted() {
            assert!(!WorkflowStage::Reserved.can_transition_to(WorkflowStage::Quoted));
            assert!(!WorkflowStage::Reserved.can_transition_to(WorkflowStage::Simulated));
        }

        #[test]
        fn reserved_only_leaves_through_cancel() {
            assert_eq!(
                WorkflowStage::Reserved.valid_transitions(),
                vec![WorkflowStage::Cancelled]
            );
        }

        #[test]
        fn quoted_does_not_reset_directly() {
            assert!(!WorkflowStage::Quoted.can_transition_to(WorkflowStage::Idle));
            assert_eq!(
                WorkflowStage::Quoted.valid_transitions(),
                vec![WorkflowStage::Simulated, WorkflowStage::Reserved]
            );
        }
    }

    mod selection_edits {
        use super::*;

        #[test]
        fn allowed_only_before_quote() {
            assert!(WorkflowStage::Idle.allows_selection_edit());
            assert!(WorkflowStage::Simulated.allows_selection_edit());
            assert!(!WorkflowStage::Quoted.allows_selection_edit());
            assert!(!WorkflowStage::Reserved.allows_selection_edit());
            assert!(!WorkflowStage::Cancelled.allows_selection_edit());
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_formats() {
            assert_eq!(WorkflowStage::Idle.to_string(), "IDLE");
            assert_eq!(WorkflowStage::Simulated.to_string(), "SIMULATED");
            assert_eq!(WorkflowStage::Quoted.to_string(), "QUOTED");
            assert_eq!(WorkflowStage::Reserved.to_string(), "RESERVED");
            assert_eq!(WorkflowStage::Cancelled.to_string(), "CANCELLED");
        }

        #[test]
        fn serde_roundtrip() {
            for stage in WorkflowStage::ALL {
                let json = serde_json::to_string(&stage).unwrap();
                let back: WorkflowStage = serde_json::from_str(&json).unwrap();
                assert_eq!(stage, back);
            }
        }
    }
}
