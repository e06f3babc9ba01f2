//! Objective - a named optimization goal over primitive inputs

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::primitive::Primitive;

/// A declared model input.
///
/// The tag is explicit: a `Derived` input is intentionally not a decision
/// variable, while a `Decision` input must resolve to a position in the
/// genome or encoding fails.
#[derive(Debug, Clone)]
pub enum ObjectiveInput {
    /// Controllable primitive supplied by the solver's genome
    Decision(Arc<Primitive>),
    /// Input sourced by the objective's own derived-input logic
    Derived(Arc<Primitive>),
}

impl ObjectiveInput {
    /// Tag a primitive according to its kind
    pub fn from_primitive(primitive: Arc<Primitive>) -> Self {
        if primitive.is_control() {
            ObjectiveInput::Decision(primitive)
        } else {
            ObjectiveInput::Derived(primitive)
        }
    }

    pub fn primitive(&self) -> &Arc<Primitive> {
        match self {
            ObjectiveInput::Decision(p) | ObjectiveInput::Derived(p) => p,
        }
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, ObjectiveInput::Decision(_))
    }
}

/// Optimization objective.
///
/// Identity is the name: two objectives with the same name are the same key
/// in the repository.
#[derive(Debug)]
pub struct Objective {
    name: String,
    inputs: Vec<ObjectiveInput>,
}

impl Objective {
    pub fn new(name: impl Into<String>, inputs: Vec<ObjectiveInput>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Build an objective whose inputs are tagged from each primitive's kind
    pub fn from_primitives(name: impl Into<String>, primitives: Vec<Arc<Primitive>>) -> Self {
        let inputs = primitives
            .into_iter()
            .map(ObjectiveInput::from_primitive)
            .collect();
        Self::new(name, inputs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered model inputs
    pub fn inputs(&self) -> &[ObjectiveInput] {
        &self.inputs
    }

    /// Decision inputs only, in declaration order
    pub fn decision_inputs(&self) -> impl Iterator<Item = &Arc<Primitive>> {
        self.inputs.iter().filter_map(|input| match input {
            ObjectiveInput::Decision(p) => Some(p),
            ObjectiveInput::Derived(_) => None,
        })
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Objective {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Objective {}

impl PartialOrd for Objective {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Objective {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Objective {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
