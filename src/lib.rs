//! # Fleetloop
//!
//! Self-adaptive runtime controller for fleets of cloud services.
//!
//! - [`repository`]: concurrent state of VMs, services, QoS/cost records and direct primitives
//! - [`encoding`]: per-objective genome index maps for a solver session
//! - [`actuator`]: applies decoded primitive values to live resources
//! - [`controller`]: configuration, topology bootstrap and the control loop

pub use fleetloop_actuator as actuator;
pub use fleetloop_common as common;
pub use fleetloop_controller as controller;
pub use fleetloop_encoding as encoding;
pub use fleetloop_repository as repository;

pub use fleetloop_common::{FleetError, Result};
