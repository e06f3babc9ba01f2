//! Fleet topology bootstrap
//!
//! Loads VMs, services, tracked QoS/cost records and objectives from a JSON
//! document into a repository. Primitive references use `owner/name`, where
//! the owner is a VM id or a service name.

use fleetloop_common::{
    Cost, Direction, Objective, Primitive, PrimitiveKind, QualityOfService, RepositoryError,
    Service, Vm,
};
use fleetloop_repository::Repository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from topology loading
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Failed to read topology: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed topology: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed primitive reference {0}, expected owner/name")]
    MalformedRef(String),

    #[error("Service {service} cannot own hardware primitive {name}")]
    HardwareOnService { service: String, name: String },

    #[error("Service {service} declares primitive {name} more than once")]
    DuplicatePrimitive { service: String, name: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub vms: Vec<VmSpec>,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
    #[serde(default)]
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSpec {
    pub id: String,
    #[serde(default)]
    pub hardware: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    /// Hosting VM; its listed hardware primitives are attached to the service
    pub vm: Option<String>,
    #[serde(default)]
    pub hardware: Vec<String>,
    #[serde(default)]
    pub primitives: Vec<PrimitiveSpec>,
    #[serde(default)]
    pub qos: Vec<QosSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveSpec {
    pub name: String,
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QosSpec {
    pub name: String,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub name: String,
    /// Model inputs in declaration order
    pub inputs: Vec<String>,
    /// Direct primitives; defaults to every input
    pub direct: Option<Vec<String>>,
}

fn split_ref(reference: &str) -> Result<(&str, &str), TopologyError> {
    match reference.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
        _ => Err(TopologyError::MalformedRef(reference.to_string())),
    }
}

impl Topology {
    pub fn from_json(contents: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Resolve `owner/name` against registered VMs first, then services
    fn resolve(repository: &Repository, reference: &str) -> Result<Arc<Primitive>, TopologyError> {
        let (owner, name) = split_ref(reference)?;
        if repository.contains_vm(owner) {
            return Ok(repository.vm(owner)?.hardware_primitive(name)?);
        }
        Ok(repository.service(owner)?.primitive(name)?)
    }

    /// Register everything into `repository`; returns the declared objectives
    pub fn apply(&self, repository: &Repository) -> Result<Vec<Arc<Objective>>, TopologyError> {
        for spec in &self.vms {
            let vm = Vm::new(spec.id.as_str());
            for name in &spec.hardware {
                vm.add_hardware_primitive(name);
            }
            repository.register_vm(&spec.id, Arc::new(vm))?;
        }

        for spec in &self.services {
            let service = Service::new(spec.name.as_str());
            if let Some(vm_id) = &spec.vm {
                let vm = repository.vm(vm_id)?;
                for name in &spec.hardware {
                    service.add_primitive(vm.hardware_primitive(name)?);
                }
            }
            for p in &spec.primitives {
                if p.kind == PrimitiveKind::HardwareControl {
                    return Err(TopologyError::HardwareOnService {
                        service: spec.name.clone(),
                        name: p.name.clone(),
                    });
                }
                // Primitives are keyed by name within a service
                if service.primitive(&p.name).is_ok() {
                    return Err(TopologyError::DuplicatePrimitive {
                        service: spec.name.clone(),
                        name: p.name.clone(),
                    });
                }
                service.add_primitive(Arc::new(Primitive::new(
                    spec.name.as_str(),
                    p.name.as_str(),
                    p.kind,
                )));
            }
            for q in &spec.qos {
                let qos = Arc::new(QualityOfService::new(
                    spec.name.as_str(),
                    q.name.as_str(),
                    q.direction,
                ));
                service.add_qos(Arc::clone(&qos));
                repository.record_qos_sample(qos);
            }
            repository.register_service(&spec.name, Arc::new(service))?;
        }

        for cost in &self.costs {
            repository.record_cost_sample(Arc::new(cost.clone()));
        }

        let mut objectives = Vec::with_capacity(self.objectives.len());
        for spec in &self.objectives {
            let inputs = spec
                .inputs
                .iter()
                .map(|r| Self::resolve(repository, r))
                .collect::<Result<Vec<_>, _>>()?;
            let objective = Arc::new(Objective::from_primitives(spec.name.as_str(), inputs.clone()));

            let direct = match &spec.direct {
                Some(refs) => refs
                    .iter()
                    .map(|r| Self::resolve(repository, r))
                    .collect::<Result<Vec<_>, _>>()?,
                None => inputs,
            };
            for primitive in direct {
                repository.declare_direct_primitive(&objective, primitive);
            }
            objectives.push(objective);
        }

        info!(
            vms = self.vms.len(),
            services = self.services.len(),
            objectives = objectives.len(),
            "Applied topology"
        );
        Ok(objectives)
    }
}
