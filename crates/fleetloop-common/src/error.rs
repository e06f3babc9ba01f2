//! Error types for the Fleetloop controller
//!
//! Provides a unified error type and the per-concern variants raised by the
//! repository, the solution encoding and the actuation layer.

use thiserror::Error;

/// Result type alias using FleetError
pub type Result<T> = std::result::Result<T, FleetError>;

/// Unified error type for Fleetloop operations
#[derive(Debug, Error)]
pub enum FleetError {
    // State repository errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    // Solution encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    // Actuation errors
    #[error("Actuation error: {0}")]
    Actuation(#[from] ActuationError),
}

/// Errors raised by the state repository and entity records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("VM not found: {0}")]
    VmNotFound(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Objective not declared: {0}")]
    ObjectiveNotFound(String),

    #[error("Primitive {name} not found on {owner}")]
    PrimitiveNotFound { owner: String, name: String },

    #[error("QoS {name} not found on service {service}")]
    QosNotFound { service: String, name: String },
}

impl RepositoryError {
    /// True for every "unknown key" variant
    pub fn is_not_found(&self) -> bool {
        !matches!(self, RepositoryError::InvalidArgument(_))
    }
}

/// Errors raised while building or applying a solution encoding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Decision input {primitive} of objective {objective} is not a direct control primitive")]
    Ambiguity { objective: String, primitive: String },

    #[error("Objective {0} is not part of this encoding session")]
    UnknownObjective(String),

    #[error("Genome length mismatch: expected {expected}, got {actual}")]
    GenomeLength { expected: usize, actual: usize },

    #[error("Gene for {primitive} is not a finite value")]
    NonFiniteGene { primitive: String },

    #[error("Genome position {0} does not fit the solver's index type")]
    PositionOverflow(usize),

    #[error("Primitive {0} has no committed value to seed the genome")]
    MissingValue(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors raised while applying a primitive change
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("No value supplied for {alias}")]
    NoValue { alias: String },

    #[error("Failed to launch actuator for {alias}: {source}")]
    Launch {
        alias: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Actuation of {alias} timed out after {elapsed_ms}ms")]
    Timeout { alias: String, elapsed_ms: u64 },
}
