//! # Application Layer
//!
//! Use cases of the purchase flow, built on the remote service port.
//!
//! - [`services`]: pricing, quotation, reservation and read services
//! - [`workflow`]: the stage machine that sequences them
//! - [`error`]: [`WorkflowError`](error::WorkflowError)

pub mod error;
pub mod services;
pub mod workflow;
