//! State repository
//!
//! Single authoritative record of VMs, services, objectives, direct
//! primitives and tracked QoS/cost records. Monitoring threads write, search
//! threads read; all synchronization happens in here.

use dashmap::DashMap;
use fleetloop_common::{Cost, Objective, Primitive, QualityOfService, RepositoryError, Service, Vm};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::direct_index::DirectPrimitiveIndex;
use crate::ordered_set::OrderedSampleSet;

/// Repository result type
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Point-in-time counts, mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub vms: usize,
    pub services: usize,
    pub objectives: usize,
    pub qos_records: usize,
    pub cost_records: usize,
}

/// Concurrent state repository.
///
/// Construct one per control loop and share it behind an `Arc`.
#[derive(Default)]
pub struct Repository {
    vms: DashMap<String, Arc<Vm>>,
    services: DashMap<String, Arc<Service>>,
    qos: OrderedSampleSet<QualityOfService>,
    cost: OrderedSampleSet<Cost>,
    direct: DirectPrimitiveIndex,
}

fn require_key(kind: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(RepositoryError::InvalidArgument(format!(
            "{} key must not be empty",
            kind
        )));
    }
    Ok(())
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Topology ============

    /// Register or replace the VM stored under `id`
    pub fn register_vm(&self, id: &str, vm: Arc<Vm>) -> Result<()> {
        require_key("VM", id)?;
        if self.vms.insert(id.to_string(), vm).is_some() {
            debug!(vm = %id, "Replaced VM registration");
        } else {
            debug!(vm = %id, "Registered VM");
        }
        Ok(())
    }

    pub fn vm(&self, id: &str) -> Result<Arc<Vm>> {
        self.vms
            .get(id)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| RepositoryError::VmNotFound(id.to_string()))
    }

    pub fn contains_vm(&self, id: &str) -> bool {
        self.vms.contains_key(id)
    }

    /// Remove a VM on an explicit topology change
    pub fn remove_vm(&self, id: &str) -> Result<Arc<Vm>> {
        let (_, vm) = self
            .vms
            .remove(id)
            .ok_or_else(|| RepositoryError::VmNotFound(id.to_string()))?;
        info!(vm = %id, "Removed VM");
        Ok(vm)
    }

    /// Snapshot of registered VMs, ordered by id
    pub fn list_vms(&self) -> Vec<Arc<Vm>> {
        let mut all: Vec<_> = self.vms.iter().map(|e| Arc::clone(e.value())).collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Register or replace the service stored under `name`
    pub fn register_service(&self, name: &str, service: Arc<Service>) -> Result<()> {
        require_key("Service", name)?;
        if self.services.insert(name.to_string(), service).is_some() {
            debug!(service = %name, "Replaced service registration");
        } else {
            debug!(service = %name, "Registered service");
        }
        Ok(())
    }

    pub fn service(&self, name: &str) -> Result<Arc<Service>> {
        self.services
            .get(name)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| RepositoryError::ServiceNotFound(name.to_string()))
    }

    pub fn contains_service(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Remove a service on an explicit topology change
    pub fn remove_service(&self, name: &str) -> Result<Arc<Service>> {
        let (_, service) = self
            .services
            .remove(name)
            .ok_or_else(|| RepositoryError::ServiceNotFound(name.to_string()))?;
        info!(service = %name, "Removed service");
        Ok(service)
    }

    /// Snapshot of registered services, ordered by name
    pub fn list_services(&self) -> Vec<Arc<Service>> {
        let mut all: Vec<_> = self
            .services
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    // ============ QoS / cost records ============

    /// Track a QoS record; returns `false` if an equal record already exists
    pub fn record_qos_sample(&self, qos: Arc<QualityOfService>) -> bool {
        self.qos.insert_if_absent(qos)
    }

    /// Track a cost record; returns `false` if an equal record already exists
    pub fn record_cost_sample(&self, cost: Arc<Cost>) -> bool {
        self.cost.insert_if_absent(cost)
    }

    pub fn list_qos_samples(&self) -> Vec<Arc<QualityOfService>> {
        self.qos.snapshot()
    }

    pub fn list_cost_samples(&self) -> Vec<Arc<Cost>> {
        self.cost.snapshot()
    }

    // ============ Staging ============

    /// Forward hardware observations to `vm_id`'s primitive `name`
    pub fn stage_hardware_primitive_value(&self, vm_id: &str, name: &str, values: &[f64]) -> Result<()> {
        self.vm(vm_id)?.stage_hardware(name, values)
    }

    /// Forward QoS observations to `service`'s metric `name`
    pub fn stage_qos_value(&self, service: &str, name: &str, values: &[f64]) -> Result<()> {
        self.service(service)?.stage_qos(name, values)
    }

    /// Forward primitive observations to `service`'s primitive `name`
    pub fn stage_primitive_value(&self, service: &str, name: &str, values: &[f64]) -> Result<()> {
        self.service(service)?.stage_primitive(name, values)
    }

    /// Ask every registered entity to commit its staged observations
    pub fn commit_staged(&self) -> usize {
        let vms: usize = self.list_vms().iter().map(|vm| vm.commit()).sum();
        let services: usize = self.list_services().iter().map(|s| s.commit()).sum();
        vms + services
    }

    // ============ Objectives ============

    /// Declare `primitive` as directly relevant to `objective`
    pub fn declare_direct_primitive(&self, objective: &Arc<Objective>, primitive: Arc<Primitive>) {
        let key = primitive.key().to_string();
        if self.direct.declare(objective, primitive) {
            debug!(objective = %objective, primitive = %key, "Declared direct primitive");
        }
    }

    /// Whether `primitive` is direct for `objective`.
    ///
    /// Fails with `ObjectiveNotFound` when the objective was never declared,
    /// which is different from `Ok(false)`.
    pub fn is_direct_primitive(&self, objective: &Objective, primitive: &Primitive) -> Result<bool> {
        self.direct.contains(objective, primitive)
    }

    /// Canonical ordered control primitives directly relevant to `objective`
    pub fn sorted_control_primitives(&self, objective: &Objective) -> Result<Vec<Arc<Primitive>>> {
        self.direct.sorted_control_primitives(objective)
    }

    /// Every direct primitive of `objective`, control or not
    pub fn direct_primitives(&self, objective: &Objective) -> Result<Vec<Arc<Primitive>>> {
        self.direct.primitives(objective)
    }

    /// Objectives directly driven by `primitive`
    pub fn objectives_driven_by(&self, primitive: &Primitive) -> Vec<Arc<Objective>> {
        self.direct.objectives_driven_by(primitive)
    }

    /// Every declared objective, ordered by name
    pub fn list_objectives(&self) -> Vec<Arc<Objective>> {
        self.direct.objectives()
    }

    pub fn stats(&self) -> RepositoryStats {
        RepositoryStats {
            vms: self.vms.len(),
            services: self.services.len(),
            objectives: self.direct.len(),
            qos_records: self.qos.len(),
            cost_records: self.cost.len(),
        }
    }
}
