//! Primitive - a named tunable or observed quantity
//!
//! Primitives come in three variants:
//! - [`PrimitiveKind::Control`]: software knob owned by a service (thread pool, cache size)
//! - [`PrimitiveKind::HardwareControl`]: hardware knob owned by a VM (memory, CPU cap)
//! - [`PrimitiveKind::Environmental`]: observed but not controllable (workload, arrival rate)
//!
//! Only the first two are decision variables for the solver. Every variant
//! exposes the same staging operation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::staging::{Sample, StagingBuffer};

/// Primitive variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Control,
    HardwareControl,
    Environmental,
}

impl PrimitiveKind {
    /// Whether primitives of this kind can be set by the controller
    #[inline]
    pub fn is_control(&self) -> bool {
        matches!(self, PrimitiveKind::Control | PrimitiveKind::HardwareControl)
    }
}

/// Identity of a primitive: owning entity plus name.
///
/// The derived ordering (owner first, then name) is the canonical ordering
/// used to lay out decision variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveKey {
    pub owner: String,
    pub name: String,
}

impl PrimitiveKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PrimitiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A primitive with its staging buffer
pub struct Primitive {
    key: PrimitiveKey,
    kind: PrimitiveKind,
    buffer: StagingBuffer,
}

impl Primitive {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            key: PrimitiveKey::new(owner, name),
            kind,
            buffer: StagingBuffer::new(),
        }
    }

    pub fn control(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(owner, name, PrimitiveKind::Control)
    }

    pub fn hardware(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(owner, name, PrimitiveKind::HardwareControl)
    }

    pub fn environmental(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(owner, name, PrimitiveKind::Environmental)
    }

    pub fn key(&self) -> &PrimitiveKey {
        &self.key
    }

    pub fn owner(&self) -> &str {
        &self.key.owner
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub fn is_control(&self) -> bool {
        self.kind.is_control()
    }

    /// Target alias handed to the actuator, e.g. `vm-1-mem`
    pub fn alias(&self) -> String {
        format!("{}-{}", self.key.owner, self.key.name)
    }

    /// Stage newly observed value(s)
    pub fn stage(&self, values: &[f64]) {
        self.buffer.stage(values);
    }

    /// Commit staged values; returns how many were committed
    pub fn commit(&self) -> usize {
        self.buffer.commit()
    }

    /// First component of the latest committed sample
    pub fn latest_value(&self) -> Option<f64> {
        self.buffer.latest().and_then(|s| s.first().copied())
    }

    pub fn latest_sample(&self) -> Option<Sample> {
        self.buffer.latest()
    }

    pub fn buffer(&self) -> &StagingBuffer {
        &self.buffer
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Primitive {}

impl PartialOrd for Primitive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Primitive {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
