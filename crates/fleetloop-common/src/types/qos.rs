//! QoS and cost records tracked by the repository
//!
//! QoS records feed under-provisioning detection, cost records feed
//! over-provisioning detection. Both live in ordered deduplicating sets whose
//! order comes from [`SampleOrder`] rather than from `Ord`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::staging::{Sample, StagingBuffer};

/// Domain-defined total order for records held in an ordered sample set.
///
/// Two records comparing `Equal` are duplicates.
pub trait SampleOrder {
    fn sample_cmp(&self, other: &Self) -> Ordering;
}

/// Whether lower or higher values are better for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

/// A QoS metric observed on a service (response time, throughput, ...)
pub struct QualityOfService {
    service: String,
    name: String,
    direction: Direction,
    buffer: StagingBuffer,
}

impl QualityOfService {
    pub fn new(service: impl Into<String>, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            service: service.into(),
            name: name.into(),
            direction,
            buffer: StagingBuffer::new(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stage(&self, values: &[f64]) {
        self.buffer.stage(values);
    }

    pub fn commit(&self) -> usize {
        self.buffer.commit()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.buffer.latest()
    }

    pub fn buffer(&self) -> &StagingBuffer {
        &self.buffer
    }
}

impl SampleOrder for QualityOfService {
    fn sample_cmp(&self, other: &Self) -> Ordering {
        self.service
            .cmp(&other.service)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Debug for QualityOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityOfService")
            .field("service", &self.service)
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish()
    }
}

/// A cost signal attached to a VM or service (e.g. memory cost of vm-1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    /// VM id or service name the cost is charged to
    pub scope: String,
    pub name: String,
    /// Price per unit of the underlying resource
    pub unit_price: f64,
}

impl Cost {
    pub fn new(scope: impl Into<String>, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            unit_price,
        }
    }
}

impl SampleOrder for Cost {
    fn sample_cmp(&self, other: &Self) -> Ordering {
        self.scope
            .cmp(&other.scope)
            .then_with(|| self.name.cmp(&other.name))
    }
}
