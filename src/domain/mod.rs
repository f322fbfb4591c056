//! # Domain Layer
//!
//! Value objects and entities of the vehicle purchase workflow. Nothing in
//! this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
