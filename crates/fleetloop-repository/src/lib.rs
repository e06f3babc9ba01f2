//! # Fleetloop Repository
//!
//! Concurrent state repository for the Fleetloop adaptive controller.
//!
//! The [`Repository`] is the only shared mutable structure of the control
//! loop. Monitoring threads register entities and stage observations,
//! search threads read objectives and their direct primitives. Callers never
//! lock anything themselves.
//!
//! ## Layout
//!
//! ```text
//! Repository
//! ├── vms          DashMap<id, Vm>
//! ├── services     DashMap<name, Service>
//! ├── direct       DirectPrimitiveIndex (objective → ordered primitives)
//! ├── qos          OrderedSampleSet<QualityOfService>
//! └── cost         OrderedSampleSet<Cost>
//! ```
//!
//! Per-key operations are linearizable. There is no cross-key atomicity.

pub mod direct_index;
pub mod ordered_set;
pub mod repository;

pub use direct_index::DirectPrimitiveIndex;
pub use ordered_set::OrderedSampleSet;
pub use repository::{Repository, RepositoryStats};
