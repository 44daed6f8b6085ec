//! Identifier-keyed record store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::package::PackageRecord;

struct Slot {
    /// First-insertion order, kept across replacements of the same key.
    seq: u64,
    record: Arc<PackageRecord>,
}

#[derive(Default)]
struct Entries {
    slots: HashMap<String, Slot>,
    next_seq: u64,
}

impl Entries {
    /// Insert, or merge over the record already held for the identifier.
    fn upsert(&mut self, record: PackageRecord) {
        match self.slots.get_mut(&record.id) {
            Some(slot) => slot.record = Arc::new(record.merged_over(&slot.record)),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let record = Arc::new(record);
                self.slots.insert(record.id.clone(), Slot { seq, record });
            }
        }
    }
}

/// At most one record per identifier.
///
/// Reads take a shared lock for the duration of a lookup or snapshot.
/// Writes are `pub(crate)`: the sync orchestrator is the single writer.
#[derive(Default)]
pub struct IndexStore {
    entries: RwLock<Entries>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record by exact identifier.
    pub fn get(&self, id: &str) -> Option<Arc<PackageRecord>> {
        self.entries
            .read()
            .slots
            .get(id)
            .map(|slot| Arc::clone(&slot.record))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().slots.is_empty()
    }

    /// All records in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<PackageRecord>> {
        let entries = self.entries.read();
        let mut slots: Vec<&Slot> = entries.slots.values().collect();
        slots.sort_unstable_by_key(|slot| slot.seq);
        slots.iter().map(|slot| Arc::clone(&slot.record)).collect()
    }

    /// Insert or merge records, in iteration order.
    ///
    /// A record merges over the one already stored for its identifier (see
    /// [`PackageRecord::merged_over`]).
    ///
    /// Returns the number of records applied.
    pub(crate) fn upsert_all<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        let mut entries = self.entries.write();
        let mut applied = 0;
        for record in records {
            entries.upsert(record);
            applied += 1;
        }
        applied
    }

    /// Replace the whole contents in one step.
    ///
    /// Records sharing an identifier merge in iteration order, later fields
    /// winning. Nothing from the previous contents survives.
    /// Returns the resulting record count.
    pub(crate) fn replace_all<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        let mut fresh = Entries::default();
        for record in records {
            fresh.upsert(record);
        }
        let count = fresh.slots.len();
        *self.entries.write() = fresh;
        count
    }

    #[cfg(test)]
    pub(crate) fn upsert(&self, record: PackageRecord) {
        self.entries.write().upsert(record);
    }
}
