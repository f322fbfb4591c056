//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`VehicleId`], [`AccessoryId`], [`QuoteId`], [`ReservationId`]: UUID-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Money`]: Non-negative decimal amount with checked arithmetic
//! - [`DepositRate`]: Fraction of a quote charged as deposit (display hint)
//!
//! ## Domain Enums
//!
//! - [`VehicleStatus`]: Catalog availability
//! - [`ReservationStatus`]: Reservation lifecycle
//! - [`WorkflowStage`]: Stage of the purchase workflow

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod money;
pub mod timestamp;
pub mod workflow_stage;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use enums::{ParseEnumError, ReservationStatus, VehicleStatus};
pub use ids::{AccessoryId, QuoteId, ReservationId, VehicleId};
pub use money::{DepositRate, Money};
pub use timestamp::Timestamp;
pub use workflow_stage::WorkflowStage;
