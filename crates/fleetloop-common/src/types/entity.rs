//! Entity records: VMs and services
//!
//! Entities own the staging buffers of their primitives and QoS metrics. The
//! repository only forwards observations to them; committing is the entity's
//! decision.

use dashmap::DashMap;
use std::sync::Arc;

use super::primitive::Primitive;
use super::qos::QualityOfService;
use crate::error::RepositoryError;

/// A virtual machine and its hardware control primitives
#[derive(Debug)]
pub struct Vm {
    id: String,
    hardware: DashMap<String, Arc<Primitive>>,
}

impl Vm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hardware: DashMap::new(),
        }
    }

    /// Builder-style registration of a hardware control primitive
    pub fn with_hardware(self, name: &str) -> Self {
        self.add_hardware_primitive(name);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register (or return the existing) hardware control primitive `name`
    pub fn add_hardware_primitive(&self, name: &str) -> Arc<Primitive> {
        self.hardware
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Primitive::hardware(self.id.as_str(), name)))
            .clone()
    }

    pub fn hardware_primitive(&self, name: &str) -> Result<Arc<Primitive>, RepositoryError> {
        self.hardware
            .get(name)
            .map(|p| Arc::clone(p.value()))
            .ok_or_else(|| RepositoryError::PrimitiveNotFound {
                owner: self.id.clone(),
                name: name.to_string(),
            })
    }

    /// Hardware primitives in canonical order
    pub fn hardware_primitives(&self) -> Vec<Arc<Primitive>> {
        let mut all: Vec<_> = self.hardware.iter().map(|e| Arc::clone(e.value())).collect();
        all.sort();
        all
    }

    pub fn stage_hardware(&self, name: &str, values: &[f64]) -> Result<(), RepositoryError> {
        self.hardware_primitive(name)?.stage(values);
        Ok(())
    }

    /// Commit every staged hardware observation
    pub fn commit(&self) -> usize {
        self.hardware.iter().map(|p| p.value().commit()).sum()
    }
}

/// A service instance, conventionally named `VM_ID-service-name`
#[derive(Debug)]
pub struct Service {
    name: String,
    primitives: DashMap<String, Arc<Primitive>>,
    qos: DashMap<String, Arc<QualityOfService>>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: DashMap::new(),
            qos: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a primitive contributing to this service's QoS.
    ///
    /// Hardware primitives of the hosting VM may be attached as well.
    pub fn add_primitive(&self, primitive: Arc<Primitive>) {
        self.primitives
            .insert(primitive.name().to_string(), primitive);
    }

    pub fn add_qos(&self, qos: Arc<QualityOfService>) {
        self.qos.insert(qos.name().to_string(), qos);
    }

    pub fn primitive(&self, name: &str) -> Result<Arc<Primitive>, RepositoryError> {
        self.primitives
            .get(name)
            .map(|p| Arc::clone(p.value()))
            .ok_or_else(|| RepositoryError::PrimitiveNotFound {
                owner: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn qos(&self, name: &str) -> Result<Arc<QualityOfService>, RepositoryError> {
        self.qos
            .get(name)
            .map(|q| Arc::clone(q.value()))
            .ok_or_else(|| RepositoryError::QosNotFound {
                service: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn primitives(&self) -> Vec<Arc<Primitive>> {
        let mut all: Vec<_> = self
            .primitives
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        all.sort();
        all
    }

    pub fn qos_metrics(&self) -> Vec<Arc<QualityOfService>> {
        let mut all: Vec<_> = self.qos.iter().map(|e| Arc::clone(e.value())).collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn stage_primitive(&self, name: &str, values: &[f64]) -> Result<(), RepositoryError> {
        self.primitive(name)?.stage(values);
        Ok(())
    }

    pub fn stage_qos(&self, name: &str, values: &[f64]) -> Result<(), RepositoryError> {
        self.qos(name)?.stage(values);
        Ok(())
    }

    /// Commit every staged primitive and QoS observation
    pub fn commit(&self) -> usize {
        let primitives: usize = self.primitives.iter().map(|p| p.value().commit()).sum();
        let qos: usize = self.qos.iter().map(|q| q.value().commit()).sum();
        primitives + qos
    }
}
