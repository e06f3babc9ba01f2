//! Solution encoding for one optimization session
//!
//! Built once from the repository, then immutable: later repository writes
//! never shift positions of a session that is already searching.

use fleetloop_common::{EncodingError, Objective, Primitive};
use fleetloop_repository::Repository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::index_map::IndexMap;
use crate::layout::GenomeLayout;

/// Encoding result type
pub type Result<T> = std::result::Result<T, EncodingError>;

/// One decoded primitive setting, ready for actuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveChange {
    /// Primitive key, `owner/name`
    pub primitive: String,
    /// Actuator target alias, `owner-name`
    pub alias: String,
    pub value: f64,
}

/// Index maps of a fixed list of objectives over one shared genome
#[derive(Debug, Clone)]
pub struct SolutionEncoding {
    objectives: Vec<Arc<Objective>>,
    layout: GenomeLayout,
    maps: HashMap<String, IndexMap>,
}

impl SolutionEncoding {
    /// Build the encoding of `objectives` from the repository's current state
    #[instrument(skip_all, fields(objectives = objectives.len()))]
    pub fn build(repository: &Repository, objectives: &[Arc<Objective>]) -> Result<Self> {
        let canonical = objectives
            .iter()
            .map(|objective| repository.sorted_control_primitives(objective))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let layout = GenomeLayout::merge(canonical.iter().cloned());

        let mut maps = HashMap::with_capacity(objectives.len());
        for (objective, own) in objectives.iter().zip(&canonical) {
            let map = IndexMap::build(objective, own, &layout)?;
            debug!(objective = %objective, indices = ?map.raw(), "Built index map");
            maps.insert(objective.name().to_string(), map);
        }

        info!(genome_len = layout.len(), "Built solution encoding");
        Ok(Self {
            objectives: objectives.to_vec(),
            layout,
            maps,
        })
    }

    /// Build over every objective currently declared in the repository
    pub fn for_all_objectives(repository: &Repository) -> Result<Self> {
        Self::build(repository, &repository.list_objectives())
    }

    pub fn objectives(&self) -> &[Arc<Objective>] {
        &self.objectives
    }

    pub fn layout(&self) -> &GenomeLayout {
        &self.layout
    }

    /// Number of decision variables in a genome of this session
    pub fn genome_len(&self) -> usize {
        self.layout.len()
    }

    pub fn index_map(&self, objective: &Objective) -> Result<&IndexMap> {
        self.maps
            .get(objective.name())
            .ok_or_else(|| EncodingError::UnknownObjective(objective.name().to_string()))
    }

    fn check_len(&self, genome: &[f64]) -> Result<()> {
        if genome.len() != self.layout.len() {
            return Err(EncodingError::GenomeLength {
                expected: self.layout.len(),
                actual: genome.len(),
            });
        }
        Ok(())
    }

    /// Model inputs of `objective` taken from `genome`.
    ///
    /// Derived inputs come back as `None`; the objective supplies them itself.
    pub fn decode(&self, objective: &Objective, genome: &[f64]) -> Result<Vec<Option<f64>>> {
        self.check_len(genome)?;
        Ok(self.index_map(objective)?.decode(genome))
    }

    /// Build a genome from a value lookup over the layout's primitives
    pub fn encode<F>(&self, mut value_of: F) -> Result<Vec<f64>>
    where
        F: FnMut(&Primitive) -> Option<f64>,
    {
        self.layout
            .primitives()
            .iter()
            .map(|primitive| {
                value_of(primitive.as_ref())
                    .ok_or_else(|| EncodingError::MissingValue(primitive.key().to_string()))
            })
            .collect()
    }

    /// Genome of the currently committed primitive values
    pub fn encode_current(&self) -> Result<Vec<f64>> {
        self.encode(|primitive| primitive.latest_value())
    }

    /// Primitive settings described by `genome`, in layout order.
    ///
    /// A NaN or infinite gene fails the whole plan; nothing is actuated.
    pub fn actuation_plan(&self, genome: &[f64]) -> Result<Vec<PrimitiveChange>> {
        self.check_len(genome)?;
        self.layout
            .primitives()
            .iter()
            .zip(genome)
            .map(|(primitive, value)| {
                if !value.is_finite() {
                    return Err(EncodingError::NonFiniteGene {
                        primitive: primitive.key().to_string(),
                    });
                }
                Ok(PrimitiveChange {
                    primitive: primitive.key().to_string(),
                    alias: primitive.alias(),
                    value: *value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetloop_common::{ObjectiveInput, RepositoryError, Vm};

    struct Fixture {
        repo: Repository,
        cpu: Arc<Primitive>,
        mem: Arc<Primitive>,
        pool: Arc<Primitive>,
        workload: Arc<Primitive>,
    }

    fn fixture() -> Fixture {
        let repo = Repository::new();
        let vm1 = Arc::new(Vm::new("vm-1").with_hardware("mem"));
        let vm2 = Arc::new(Vm::new("vm-2").with_hardware("cpu"));
        repo.register_vm("vm-1", Arc::clone(&vm1)).unwrap();
        repo.register_vm("vm-2", Arc::clone(&vm2)).unwrap();

        Fixture {
            mem: vm1.hardware_primitive("mem").unwrap(),
            cpu: vm2.hardware_primitive("cpu").unwrap(),
            pool: Arc::new(Primitive::control("vm-1-web", "pool")),
            workload: Arc::new(Primitive::environmental("vm-1-web", "workload")),
            repo,
        }
    }

    fn declare(repo: &Repository, name: &str, inputs: Vec<Arc<Primitive>>) -> Arc<Objective> {
        let objective = Arc::new(Objective::from_primitives(name, inputs.clone()));
        for p in inputs {
            repo.declare_direct_primitive(&objective, p);
        }
        objective
    }

    #[test]
    fn test_declaration_order_differs_from_canonical() {
        let f = fixture();
        // Declared [cpu, mem]; canonical order is [vm-1/mem, vm-2/cpu]
        let latency = declare(&f.repo, "latencyQoS", vec![Arc::clone(&f.cpu), Arc::clone(&f.mem)]);

        let canonical: Vec<_> = f
            .repo
            .sorted_control_primitives(&latency)
            .unwrap()
            .iter()
            .map(|p| p.key().to_string())
            .collect();
        assert_eq!(canonical, vec!["vm-1/mem", "vm-2/cpu"]);

        let encoding = SolutionEncoding::build(&f.repo, &[Arc::clone(&latency)]).unwrap();
        assert_eq!(encoding.index_map(&latency).unwrap().raw(), vec![1, 0]);
    }

    #[test]
    fn test_index_stability() {
        let f = fixture();
        let latency = declare(
            &f.repo,
            "latency",
            vec![Arc::clone(&f.mem), Arc::clone(&f.workload), Arc::clone(&f.cpu)],
        );

        let first = SolutionEncoding::build(&f.repo, &[Arc::clone(&latency)]).unwrap();
        let second = SolutionEncoding::build(&f.repo, &[Arc::clone(&latency)]).unwrap();
        assert_eq!(
            first.index_map(&latency).unwrap().raw(),
            second.index_map(&latency).unwrap().raw()
        );
        assert_eq!(first.index_map(&latency).unwrap().raw(), vec![0, -1, 1]);
    }

    #[test]
    fn test_session_unaffected_by_later_writes() {
        let f = fixture();
        let latency = declare(&f.repo, "latency", vec![Arc::clone(&f.cpu)]);
        let encoding = SolutionEncoding::build(&f.repo, &[Arc::clone(&latency)]).unwrap();

        // vm-1/mem sorts before vm-2/cpu and would shift it in a new session
        f.repo.declare_direct_primitive(&latency, Arc::clone(&f.mem));

        assert_eq!(encoding.genome_len(), 1);
        assert_eq!(encoding.index_map(&latency).unwrap().raw(), vec![0]);
    }

    #[test]
    fn test_shared_primitive_same_index() {
        let f = fixture();
        let latency = declare(&f.repo, "latency", vec![Arc::clone(&f.cpu), Arc::clone(&f.pool)]);
        let cost = declare(&f.repo, "cost", vec![Arc::clone(&f.mem), Arc::clone(&f.cpu)]);

        let encoding =
            SolutionEncoding::build(&f.repo, &[Arc::clone(&latency), Arc::clone(&cost)]).unwrap();

        assert_eq!(encoding.genome_len(), 3);
        let cpu_in_latency = encoding.index_map(&latency).unwrap().raw()[0];
        let cpu_in_cost = encoding.index_map(&cost).unwrap().raw()[1];
        assert_eq!(cpu_in_latency, cpu_in_cost);
    }

    #[test]
    fn test_undeclared_objective_propagates() {
        let f = fixture();
        let orphan = Arc::new(Objective::from_primitives("orphan", vec![Arc::clone(&f.mem)]));

        let err = SolutionEncoding::build(&f.repo, &[orphan]).unwrap_err();
        assert_eq!(
            err,
            EncodingError::Repository(RepositoryError::ObjectiveNotFound("orphan".into()))
        );
    }

    #[test]
    fn test_decision_input_not_declared_direct() {
        let f = fixture();
        // Input list mentions mem but only cpu was declared direct
        let latency = Arc::new(Objective::new(
            "latency",
            vec![
                ObjectiveInput::Decision(Arc::clone(&f.cpu)),
                ObjectiveInput::Decision(Arc::clone(&f.mem)),
            ],
        ));
        f.repo.declare_direct_primitive(&latency, Arc::clone(&f.cpu));

        let err = SolutionEncoding::build(&f.repo, &[latency]).unwrap_err();
        assert!(matches!(err, EncodingError::Ambiguity { .. }));
    }

    #[test]
    fn test_decode_and_plan() {
        let f = fixture();
        let latency = declare(
            &f.repo,
            "latency",
            vec![Arc::clone(&f.workload), Arc::clone(&f.mem), Arc::clone(&f.cpu)],
        );
        let encoding = SolutionEncoding::build(&f.repo, &[Arc::clone(&latency)]).unwrap();

        let genome = [2048.0, 2.0];
        assert_eq!(
            encoding.decode(&latency, &genome).unwrap(),
            vec![None, Some(2048.0), Some(2.0)]
        );

        let plan = encoding.actuation_plan(&genome).unwrap();
        assert_eq!(plan[0].alias, "vm-1-mem");
        assert_eq!(plan[0].value, 2048.0);
        assert_eq!(plan[1].primitive, "vm-2/cpu");

        assert_eq!(
            encoding.decode(&latency, &[1.0]).unwrap_err(),
            EncodingError::GenomeLength {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_plan_rejects_non_finite_genes() {
        let f = fixture();
        let latency = declare(&f.repo, "latency", vec![Arc::clone(&f.mem), Arc::clone(&f.cpu)]);
        let encoding = SolutionEncoding::build(&f.repo, &[latency]).unwrap();

        assert_eq!(
            encoding.actuation_plan(&[f64::NAN, 2.0]).unwrap_err(),
            EncodingError::NonFiniteGene {
                primitive: "vm-1/mem".into()
            }
        );
        assert_eq!(
            encoding.actuation_plan(&[2048.0, f64::INFINITY]).unwrap_err(),
            EncodingError::NonFiniteGene {
                primitive: "vm-2/cpu".into()
            }
        );
        assert!(encoding.actuation_plan(&[2048.0, 2.0]).is_ok());
    }

    #[test]
    fn test_encode_current() {
        let f = fixture();
        let latency = declare(&f.repo, "latency", vec![Arc::clone(&f.mem), Arc::clone(&f.cpu)]);
        let encoding = SolutionEncoding::build(&f.repo, &[latency]).unwrap();

        f.repo
            .stage_hardware_primitive_value("vm-1", "mem", &[1024.0])
            .unwrap();
        f.repo.commit_staged();
        assert_eq!(
            encoding.encode_current().unwrap_err(),
            EncodingError::MissingValue("vm-2/cpu".into())
        );

        f.repo
            .stage_hardware_primitive_value("vm-2", "cpu", &[4.0])
            .unwrap();
        f.repo.commit_staged();
        assert_eq!(encoding.encode_current().unwrap(), vec![1024.0, 4.0]);
    }

    #[test]
    fn test_unknown_objective_in_session() {
        let f = fixture();
        let latency = declare(&f.repo, "latency", vec![Arc::clone(&f.mem)]);
        let encoding = SolutionEncoding::build(&f.repo, &[latency]).unwrap();

        let other = Objective::new("throughput", vec![]);
        assert_eq!(
            encoding.index_map(&other).unwrap_err(),
            EncodingError::UnknownObjective("throughput".into())
        );
    }

    #[test]
    fn test_plan_serializes() {
        let change = PrimitiveChange {
            primitive: "vm-1/mem".into(),
            alias: "vm-1-mem".into(),
            value: 2048.0,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("vm-1-mem"));
    }
}
