//! # Fleetloop Controller
//!
//! Wires the repository, solution encoding and actuator into a running
//! controller: configuration loading, topology bootstrap and the
//! [`ControlLoop`] used by the `fleetloopd` binary.

pub mod config;
pub mod control_loop;
pub mod topology;

pub use config::{ActuatorSettings, ControlSettings, ControllerConfig};
pub use control_loop::{ControlLoop, TickReport};
pub use topology::{Topology, TopologyError};
