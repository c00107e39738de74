//! LRU-K replacement policy.
//!
//! Extends "used recently" to "used at least K times recently": a key is
//! only admitted into the bounded recency structure after K observed
//! accesses. One-off scans never reach the cache, so they cannot pollute
//! it. The cost is the pending-counter map for keys seen but not yet
//! admitted, which grows with the number of distinct keys observed.
//!
//! K = 2 is the usual sweet spot; larger K raises the hit rate on stable
//! workloads but adapts slowly. K = 1 degenerates to plain LRU.

use std::collections::HashMap;
use std::hash::Hash;

use log::trace;

use crate::common::{Error, Result};
use crate::policy::list::IndexedList;
use crate::policy::{EvictionListener, ReplacementPolicy};

/// A recency cache with a K-th-access admission gate.
///
/// # Example
/// ```
/// use swapcache::LrukCache;
///
/// let mut cache = LrukCache::new(0, 2).unwrap();
/// cache.insert("a", 1);
/// assert_eq!(cache.get(&"a"), None); // one observed access: not admitted
/// cache.insert("a", 1); // count is past K by now: admitted
/// assert_eq!(cache.get(&"a"), Some(&1));
/// ```
pub struct LrukCache<K, V> {
    /// Maximum resident entries; 0 means no limit.
    max_entries: usize,

    /// Accesses required before admission.
    k: usize,

    /// Recency order + index over admitted entries.
    list: IndexedList<K, V>,

    /// Observed-access counts for keys not yet admitted.
    pending: HashMap<K, usize>,

    /// Optional callback for displaced entries.
    on_evict: Option<EvictionListener<K, V>>,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new cache. If `max_entries` is zero, the cache has no
    /// limit.
    ///
    /// # Errors
    /// [`Error::InvalidK`] if `k` is zero.
    pub fn new(max_entries: usize, k: usize) -> Result<Self> {
        Self::build(max_entries, k, None)
    }

    /// Create a new cache with an eviction listener.
    ///
    /// # Errors
    /// [`Error::InvalidK`] if `k` is zero.
    pub fn with_listener(
        max_entries: usize,
        k: usize,
        listener: EvictionListener<K, V>,
    ) -> Result<Self> {
        Self::build(max_entries, k, Some(listener))
    }

    fn build(max_entries: usize, k: usize, on_evict: Option<EvictionListener<K, V>>) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidK);
        }
        Ok(Self {
            max_entries,
            k,
            list: IndexedList::new(),
            pending: HashMap::new(),
            on_evict,
        })
    }

    /// Insert or update a value.
    ///
    /// A resident key is refreshed and overwritten. A non-resident key
    /// has its pending count incremented; until the count reaches K the
    /// call returns without caching the value. The K-th access discards
    /// the counter and admits the entry, evicting the recency victim if
    /// the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(resident) = self.list.get_mut(&key) {
            *resident = value;
            self.list.move_to_front(&key);
            return;
        }

        let count = self.pending.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count < self.k {
            return;
        }
        self.pending.remove(&key);

        if self.max_entries > 0 && self.list.len() == self.max_entries {
            self.evict_back();
        }
        self.list.push_front(key, value);
    }

    /// Look up a key.
    ///
    /// A hit refreshes recency. A miss still counts as an observed
    /// access: the pending counter is incremented (created at 1 if
    /// absent) so repeated probes eventually qualify the key.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.list.move_to_front(key) {
            return self.list.get(key);
        }

        *self.pending.entry(key.clone()).or_insert(0) += 1;
        None
    }

    /// Remove a key: residency and any pending counter both go away. The
    /// listener does not fire.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key);
        self.list.remove(key)
    }

    /// Number of resident entries. Keys tracked by pending counters are
    /// not resident and are not counted.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the cache holds no resident entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Empty the cache, reporting every resident entry to the listener.
    /// Pending counters are discarded silently.
    pub fn clear(&mut self) {
        if self.on_evict.is_some() {
            while let Some((key, value)) = self.list.pop_back() {
                if let Some(listener) = &mut self.on_evict {
                    listener(key, value);
                }
            }
        }
        self.list.clear();
        self.pending.clear();
    }

    fn evict_back(&mut self) {
        if let Some((key, value)) = self.list.pop_back() {
            trace!("lru-k: capacity eviction, {} resident", self.list.len());
            if let Some(listener) = &mut self.on_evict {
                listener(key, value);
            }
        }
    }
}

impl<K, V> ReplacementPolicy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) {
        LrukCache::insert(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LrukCache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LrukCache::remove(self, key)
    }

    fn len(&self) -> usize {
        LrukCache::len(self)
    }

    fn clear(&mut self) {
        LrukCache::clear(self);
    }
}
