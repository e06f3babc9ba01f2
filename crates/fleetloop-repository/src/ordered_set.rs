//! Ordered deduplicating sample set
//!
//! Keeps records sorted by their [`SampleOrder`] under concurrent insert.
//! Readers take a snapshot, so enumeration never observes a half-applied
//! insert and never fails.

use fleetloop_common::SampleOrder;
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Adapter giving `Arc<T>` the domain order as its `Ord`
struct Ordered<T>(Arc<T>);

impl<T: SampleOrder> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.sample_cmp(&other.0) == Ordering::Equal
    }
}

impl<T: SampleOrder> Eq for Ordered<T> {}

impl<T: SampleOrder> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SampleOrder> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.sample_cmp(&other.0)
    }
}

/// Borrowed view of a set key, so lookups can take a plain `&T`
trait Keyed<T> {
    fn key(&self) -> &T;
}

impl<T> Keyed<T> for Ordered<T> {
    fn key(&self) -> &T {
        &self.0
    }
}

/// Lookup key wrapping a caller's record
struct Probe<'p, T>(&'p T);

impl<T> Keyed<T> for Probe<'_, T> {
    fn key(&self) -> &T {
        self.0
    }
}

impl<'a, T: SampleOrder + 'a> Borrow<dyn Keyed<T> + 'a> for Ordered<T> {
    fn borrow(&self) -> &(dyn Keyed<T> + 'a) {
        self
    }
}

impl<T: SampleOrder> PartialEq for dyn Keyed<T> + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.key().sample_cmp(other.key()) == Ordering::Equal
    }
}

impl<T: SampleOrder> Eq for dyn Keyed<T> + '_ {}

impl<T: SampleOrder> PartialOrd for dyn Keyed<T> + '_ {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SampleOrder> Ord for dyn Keyed<T> + '_ {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().sample_cmp(other.key())
    }
}

/// Sorted set of records, deduplicated by [`SampleOrder`]
pub struct OrderedSampleSet<T> {
    inner: RwLock<BTreeSet<Ordered<T>>>,
}

impl<T: SampleOrder> Default for OrderedSampleSet<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(BTreeSet::new()),
        }
    }
}

impl<T: SampleOrder> OrderedSampleSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` unless a record comparing equal is already present.
    ///
    /// Returns `true` if the item was inserted. An existing equal record is
    /// kept as is.
    pub fn insert_if_absent(&self, item: Arc<T>) -> bool {
        self.inner.write().insert(Ordered(item))
    }

    /// Whether a record comparing equal to `record` is present
    pub fn contains(&self, record: &T) -> bool {
        let key = Probe(record);
        self.inner.read().contains(&key as &dyn Keyed<T>)
    }

    /// Remove the record comparing equal to `record`, if any
    pub fn remove(&self, record: &T) -> Option<Arc<T>> {
        let key = Probe(record);
        self.inner
            .write()
            .take(&key as &dyn Keyed<T>)
            .map(|e| e.0)
    }

    /// Point-in-time snapshot in domain order
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.inner.read().iter().map(|e| Arc::clone(&e.0)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
