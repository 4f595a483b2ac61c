use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Default budget: four million stored floats (32 MB) per cache.
const DEFAULT_CAPACITY: usize = 4_000_000;

/// Size of a cached value in the cache's budget units.
pub trait Weighted {
    fn weight(&self) -> usize;
}

/// Memo of finished reports keyed by the exact parameter tuple.
///
/// Reports are pure functions of their key, so entries never go stale. The
/// summed [`Weighted::weight`] of the entries stays within `capacity`; the map
/// is cleared when an insert would exceed it, and a value heavier than the
/// whole budget is returned without being stored. Computation happens outside
/// the lock; two racing misses both compute and the first insert wins.
pub struct ReportCache<K, V> {
    entries: Mutex<Entries<K, V>>,
    capacity: usize,
}

struct Entries<K, V> {
    map: HashMap<K, Arc<V>>,
    weight: usize,
}

impl<K: Hash + Eq, V: Weighted> ReportCache<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                weight: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.lock().map.get(key).cloned()
    }

    /// Returns the cached report for `key`, computing it on a miss. Errors are not cached.
    pub fn get_or_try_insert_with<F>(&self, key: K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.get(&key) {
            log::debug!("report cache hit");
            return Ok(hit);
        }

        let value = Arc::new(compute()?);
        let weight = value.weight();
        if weight > self.capacity {
            log::debug!("report of weight {} exceeds the cache budget, not stored", weight);
            return Ok(value);
        }

        let mut entries = self.entries.lock();
        if let Some(hit) = entries.map.get(&key) {
            return Ok(hit.clone());
        }
        if entries.weight + weight > self.capacity {
            log::debug!(
                "report cache full ({} entries, weight {}), clearing",
                entries.map.len(),
                entries.weight
            );
            entries.map.clear();
            entries.weight = 0;
        }
        entries.weight += weight;
        entries.map.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    /// Summed weight of the stored entries.
    pub fn weight(&self) -> usize {
        self.entries.lock().weight
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Hash + Eq, V: Weighted> Default for ReportCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
