//! Session genome layout
//!
//! One genome is shared by every objective of a session. Its positions are
//! the union of each objective's canonical control primitives, kept in the
//! same canonical order, so a primitive shared by two objectives has a single
//! position.

use fleetloop_common::Primitive;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GenomeLayout {
    primitives: Vec<Arc<Primitive>>,
}

impl GenomeLayout {
    /// Merge canonical per-objective lists into one deduplicated layout
    pub fn merge<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<Arc<Primitive>>>,
    {
        let merged: BTreeSet<Arc<Primitive>> = lists.into_iter().flatten().collect();
        Self {
            primitives: merged.into_iter().collect(),
        }
    }

    /// Position of `primitive` in the genome
    pub fn position(&self, primitive: &Primitive) -> Option<usize> {
        self.primitives
            .binary_search_by(|candidate| candidate.as_ref().cmp(primitive))
            .ok()
    }

    pub fn get(&self, position: usize) -> Option<&Arc<Primitive>> {
        self.primitives.get(position)
    }

    pub fn primitives(&self) -> &[Arc<Primitive>] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_dedups_and_orders() {
        let mem = Arc::new(Primitive::hardware("vm-1", "mem"));
        let cpu = Arc::new(Primitive::hardware("vm-2", "cpu"));
        let pool = Arc::new(Primitive::control("vm-1-web", "pool"));

        let layout = GenomeLayout::merge(vec![
            vec![Arc::clone(&mem), Arc::clone(&cpu)],
            vec![Arc::clone(&mem), Arc::clone(&pool)],
        ]);

        assert_eq!(layout.len(), 3);
        assert_eq!(layout.position(&mem), Some(0));
        assert_eq!(layout.position(&pool), Some(1));
        assert_eq!(layout.position(&cpu), Some(2));
        assert_eq!(layout.position(&Primitive::hardware("vm-3", "mem")), None);
    }

    #[test]
    fn test_empty_layout() {
        let layout = GenomeLayout::merge(Vec::<Vec<Arc<Primitive>>>::new());
        assert!(layout.is_empty());
        assert!(layout.get(0).is_none());
    }
}
