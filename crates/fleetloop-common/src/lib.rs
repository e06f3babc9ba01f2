//! # Fleetloop Common
//!
//! Shared domain types and errors for the Fleetloop self-adaptive controller.
//!
//! ## Core Types
//!
//! - [`Primitive`]: tunable or observed quantity with a staging buffer
//! - [`Objective`]: optimization goal declaring ordered primitive inputs
//! - [`Vm`]/[`Service`]: entity records owning primitives and QoS metrics
//! - [`QualityOfService`]/[`Cost`]: records kept in ordered deduplicating sets
//!
//! ## Errors
//!
//! - [`RepositoryError`]: unknown keys and invalid registrations
//! - [`EncodingError`]: genome layout and decoding failures
//! - [`ActuationError`]: launch failures and timeouts

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ActuationError, EncodingError, FleetError, RepositoryError, Result};
pub use types::{
    entity::{Service, Vm},
    objective::{Objective, ObjectiveInput},
    primitive::{Primitive, PrimitiveKey, PrimitiveKind},
    qos::{Cost, Direction, QualityOfService, SampleOrder},
    staging::{Sample, StagingBuffer},
};

/// Fleetloop version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Genome index for an input that is not a decision variable
pub const NOT_A_DECISION_VARIABLE: i32 = -1;
