//! # Fleetloop Encoding
//!
//! Converts "which control primitives drive which objective" into a
//! fixed-position genome for an external multi-objective solver.
//!
//! ## Index maps
//!
//! ```text
//! objective inputs   [ cpu , workload , mem ]
//! genome layout      [ vm-1/mem , vm-2/cpu ]
//! index map          [   1   ,    -1    ,  0  ]
//! ```
//!
//! Each objective gets one slot per declared model input: the position of a
//! decision input in the shared genome, or `-1` for an input the objective
//! derives itself. A decision input that cannot be placed is an
//! [`EncodingError::Ambiguity`](fleetloop_common::EncodingError), never a
//! silent `-1`.

pub mod index_map;
pub mod layout;
pub mod session;

pub use index_map::{GeneSlot, IndexMap};
pub use layout::GenomeLayout;
pub use session::{PrimitiveChange, SolutionEncoding};
