//! Objective → direct primitives relation
//!
//! Records which primitives causally drive which objective. Drives the
//! genome layout and over/under-provisioning detection.

use dashmap::DashMap;
use fleetloop_common::{Objective, Primitive, RepositoryError};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

struct DirectEntry {
    objective: Arc<Objective>,
    primitives: RwLock<BTreeSet<Arc<Primitive>>>,
}

/// Concurrent index of direct primitives per objective
#[derive(Default)]
pub struct DirectPrimitiveIndex {
    entries: DashMap<String, Arc<DirectEntry>>,
}

impl DirectPrimitiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `primitive` as directly relevant to `objective`.
    ///
    /// The objective's primitive set is created on first use; concurrent first
    /// declarations for the same objective share one set. Returns `true` if
    /// the relation is new.
    pub fn declare(&self, objective: &Arc<Objective>, primitive: Arc<Primitive>) -> bool {
        let entry = self
            .entries
            .entry(objective.name().to_string())
            .or_insert_with(|| {
                Arc::new(DirectEntry {
                    objective: Arc::clone(objective),
                    primitives: RwLock::new(BTreeSet::new()),
                })
            })
            .clone();

        let mut primitives = entry.primitives.write();
        primitives.insert(primitive)
    }

    fn entry(&self, objective: &Objective) -> Result<Arc<DirectEntry>, RepositoryError> {
        self.entries
            .get(objective.name())
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| RepositoryError::ObjectiveNotFound(objective.name().to_string()))
    }

    /// Membership test; `ObjectiveNotFound` if the objective was never declared
    pub fn contains(&self, objective: &Objective, primitive: &Primitive) -> Result<bool, RepositoryError> {
        let entry = self.entry(objective)?;
        let found = entry.primitives.read().contains(primitive);
        Ok(found)
    }

    /// All direct primitives of `objective`, in canonical order
    pub fn primitives(&self, objective: &Objective) -> Result<Vec<Arc<Primitive>>, RepositoryError> {
        let entry = self.entry(objective)?;
        let primitives = entry.primitives.read().iter().cloned().collect();
        Ok(primitives)
    }

    /// Direct control primitives of `objective`, in canonical order
    pub fn sorted_control_primitives(
        &self,
        objective: &Objective,
    ) -> Result<Vec<Arc<Primitive>>, RepositoryError> {
        let entry = self.entry(objective)?;
        let primitives = entry
            .primitives
            .read()
            .iter()
            .filter(|p| p.is_control())
            .cloned()
            .collect();
        Ok(primitives)
    }

    /// Every declared objective, ordered by name
    pub fn objectives(&self) -> Vec<Arc<Objective>> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|e| Arc::clone(&e.value().objective))
            .collect();
        all.sort();
        all
    }

    /// Objectives that `primitive` directly drives, ordered by name
    pub fn objectives_driven_by(&self, primitive: &Primitive) -> Vec<Arc<Objective>> {
        let entries: Vec<_> = self.entries.iter().map(|e| Arc::clone(e.value())).collect();
        let mut driven: Vec<_> = entries
            .into_iter()
            .filter(|entry| entry.primitives.read().contains(primitive))
            .map(|entry| Arc::clone(&entry.objective))
            .collect();
        driven.sort();
        driven
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
