//! Per-objective index map into the session genome

use fleetloop_common::{EncodingError, Objective, ObjectiveInput, Primitive, NOT_A_DECISION_VARIABLE};
use std::sync::Arc;

use crate::layout::GenomeLayout;

/// Where an objective input takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneSlot {
    /// Position in the session genome
    Gene(usize),
    /// Not a decision variable; supplied by the objective's derived-input logic
    Derived,
}

impl GeneSlot {
    /// Slot for genome `position`; fails if it cannot be expressed as a raw index
    pub fn gene(position: usize) -> Result<Self, EncodingError> {
        i32::try_from(position)
            .map(|_| GeneSlot::Gene(position))
            .map_err(|_| EncodingError::PositionOverflow(position))
    }

    /// Raw index as consumed by the solver, `-1` for derived inputs.
    ///
    /// Slots built through [`GeneSlot::gene`] always fit.
    pub fn raw(&self) -> i32 {
        match self {
            GeneSlot::Gene(position) => i32::try_from(*position).unwrap_or(i32::MAX),
            GeneSlot::Derived => NOT_A_DECISION_VARIABLE,
        }
    }
}

/// Index array of one objective: one slot per declared input
#[derive(Debug, Clone)]
pub struct IndexMap {
    objective: Arc<Objective>,
    slots: Vec<GeneSlot>,
}

impl IndexMap {
    /// Build the index map of `objective`.
    ///
    /// `canonical` is the objective's own canonical control primitive list;
    /// every decision input must appear in it.
    pub fn build(
        objective: &Arc<Objective>,
        canonical: &[Arc<Primitive>],
        layout: &GenomeLayout,
    ) -> Result<Self, EncodingError> {
        let ambiguity = |primitive: &Primitive| EncodingError::Ambiguity {
            objective: objective.name().to_string(),
            primitive: primitive.key().to_string(),
        };

        let slots = objective
            .inputs()
            .iter()
            .map(|input| match input {
                ObjectiveInput::Derived(_) => Ok(GeneSlot::Derived),
                ObjectiveInput::Decision(primitive) => {
                    canonical
                        .binary_search_by(|c| c.as_ref().cmp(primitive.as_ref()))
                        .map_err(|_| ambiguity(primitive.as_ref()))?;
                    let position = layout
                        .position(primitive)
                        .ok_or_else(|| ambiguity(primitive.as_ref()))?;
                    GeneSlot::gene(position)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            objective: Arc::clone(objective),
            slots,
        })
    }

    pub fn objective(&self) -> &Arc<Objective> {
        &self.objective
    }

    pub fn slots(&self) -> &[GeneSlot] {
        &self.slots
    }

    /// Raw index array, `-1` marking derived inputs
    pub fn raw(&self) -> Vec<i32> {
        self.slots.iter().map(GeneSlot::raw).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Values for each input from `genome`; `None` for derived inputs.
    ///
    /// The genome length is validated by the owning session.
    pub(crate) fn decode(&self, genome: &[f64]) -> Vec<Option<f64>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                GeneSlot::Gene(position) => genome.get(*position).copied(),
                GeneSlot::Derived => None,
            })
            .collect()
    }
}
