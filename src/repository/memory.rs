//! In-memory record store.
//!
//! Every operation takes the same coarse lock. There is no read/write split
//! and no per-record locking: the store backs a low-volume test fixture.

use super::{RecordRepository, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe, identity-keyed map of records.
pub struct MemoryStore<V> {
    records: Mutex<HashMap<String, V>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, V>> {
        // Every mutation is a single insert or remove, so a poisoned map is
        // still consistent.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecordRepository<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn create(&self, id: &str, value: V) -> StoreResult<()> {
        let mut records = self.records();
        if records.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        records.insert(id.to_string(), value);
        Ok(())
    }

    fn retrieve(&self, id: &str) -> Option<V> {
        self.records().get(id).cloned()
    }

    fn update(&self, id: &str, value: V) -> StoreResult<()> {
        let mut records = self.records();
        match records.get_mut(id) {
            Some(existing) => {
                *existing = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn delete(&self, id: &str) {
        self.records().remove(id);
    }

    fn list(&self) -> Vec<String> {
        self.records().keys().cloned().collect()
    }
}
