//! Exact-match index keyed by canonical key.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::ArtifactRecord;

/// Point-lookup index from canonical key to record.
///
/// `try_insert` is the linearization point for commits: under one write
/// lock it either claims the key or reports the record that already owns
/// it, so at most one record can ever exist per canonical key.
pub struct ExactIndex {
    entries: RwLock<HashMap<String, Arc<ArtifactRecord>>>,
}

impl ExactIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, canonical_key: &str) -> Option<Arc<ArtifactRecord>> {
        self.entries.read().unwrap().get(canonical_key).cloned()
    }

    /// Compare-and-insert. `Err` carries the record already holding the key.
    pub fn try_insert(
        &self,
        record: Arc<ArtifactRecord>,
    ) -> std::result::Result<(), Arc<ArtifactRecord>> {
        let mut entries = self.entries.write().unwrap();
        match entries.entry(record.canonical_key.clone()) {
            Entry::Occupied(existing) => Err(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Rolls back a claimed key when a later commit step fails.
    pub(crate) fn remove(&self, canonical_key: &str) -> Option<Arc<ArtifactRecord>> {
        self.entries.write().unwrap().remove(canonical_key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ExactIndex {
    fn default() -> Self {
        Self::new()
    }
}
