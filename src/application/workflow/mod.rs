//! # Purchase Workflow
//!
//! The explicit state machine behind simulate → quote → reserve → cancel.
//!
//! - [`Workflow`]: the actions and their guards
//! - [`WorkflowState`]: one variant per stage with only that stage's data
//! - [`WorkflowSnapshot`]: read model for presentation

pub mod machine;
pub mod state;

pub use machine::Workflow;
pub use state::{WorkflowFailure, WorkflowSnapshot, WorkflowState};
