//! # Fleetloop Actuator
//!
//! Applies decoded primitive values to live resources.
//!
//! - [`ScriptActuator`]: one host command per change, or a logged no-op in dry-run mode
//! - [`CommandRunner`]: seam over process spawning ([`ProcessRunner`] by default)
//! - [`apply_changes`]: per-candidate batch with caller-imposed timeouts
//!
//! Failures are reported as `false`; retrying is the caller's decision.

pub mod batch;
pub mod runner;
pub mod script;

use async_trait::async_trait;

pub use batch::{apply_changes, execute_with_timeout, ActuationReport};
pub use runner::{CommandRunner, Invocation, ProcessRunner};
pub use script::{ActuationOutcome, ActuatorCommand, ScriptActuator};

/// Applies one primitive change to a target resource
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Set `alias` to `values`; `true` on success
    async fn execute(&self, alias: &str, values: &[i64]) -> bool;
}
