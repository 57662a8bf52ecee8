/// Local state folded from change events

use std::collections::BTreeMap;

use crate::changes::{Change, CollectionRecord};

/// Records of one collection keyed by id, kept current by [`LocalView::apply`]
///
/// Inserts and updates both overwrite, and deleting an absent id is a no-op,
/// so replaying the same change twice leaves the view unchanged.
#[derive(Debug, Clone)]
pub struct LocalView<T: CollectionRecord> {
    records: BTreeMap<T::Id, T>,
}

impl<T: CollectionRecord> LocalView<T> {
    pub fn new() -> Self {
        Self { records: BTreeMap::new() }
    }

    /// Seed the view from an initial load
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Self {
        Self { records: records.into_iter().map(|r| (r.id(), r)).collect() }
    }

    pub fn apply(&mut self, change: Change<T>) {
        match change {
            Change::Insert(new) | Change::Update { new, .. } => {
                self.records.insert(new.id(), new);
            }
            Change::Delete(old) => {
                self.records.remove(&old.id());
            }
        }
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }
}

impl<T: CollectionRecord> Default for LocalView<T> {
    fn default() -> Self {
        Self::new()
    }
}
