//! 2Q (Two-Queue) replacement policy.
//!
//! Splits the cache into a FIFO probation queue and a recency-managed
//! main queue. A first-touch key lands in probation; a second touch
//! promotes it into main, where it lives under plain LRU rules. One-hit
//! wonders wash out of probation in insertion order without ever
//! displacing a promoted entry, giving LRU-2-like scan resistance at the
//! cost of two simple queues.

use std::hash::Hash;

use log::trace;

use crate::common::{Error, Result};
use crate::policy::list::IndexedList;
use crate::policy::{EvictionListener, ReplacementPolicy};

/// A two-queue cache: FIFO probation in front of a recency main queue.
///
/// `max_entries` bounds each queue independently, so up to
/// `2 * max_entries` entries may be resident.
///
/// # Example
/// ```
/// use swapcache::TwoQueueCache;
///
/// let mut cache = TwoQueueCache::new(2).unwrap();
/// cache.insert("a", 1); // probation
/// cache.get(&"a");      // promoted to main
/// cache.insert("b", 2); // probation
/// cache.insert("c", 3); // probation
/// cache.insert("d", 4); // probation full: "b" washes out
///
/// assert_eq!(cache.get(&"a"), Some(&1));
/// assert_eq!(cache.get(&"b"), None);
/// ```
pub struct TwoQueueCache<K, V> {
    /// Bound applied to each of probation and main.
    max_entries: usize,

    /// First-touch entries, insertion order. Never reordered; the back is
    /// the oldest.
    probation: IndexedList<K, V>,

    /// Promoted entries, recency order.
    main: IndexedList<K, V>,

    /// Optional callback for displaced entries.
    on_evict: Option<EvictionListener<K, V>>,
}

impl<K, V> TwoQueueCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new cache.
    ///
    /// # Errors
    /// [`Error::InvalidMaxEntries`] if `max_entries` is zero; both queues
    /// need a positive bound.
    pub fn new(max_entries: usize) -> Result<Self> {
        Self::build(max_entries, None)
    }

    /// Create a new cache with an eviction listener.
    ///
    /// # Errors
    /// [`Error::InvalidMaxEntries`] if `max_entries` is zero.
    pub fn with_listener(max_entries: usize, listener: EvictionListener<K, V>) -> Result<Self> {
        Self::build(max_entries, Some(listener))
    }

    fn build(max_entries: usize, on_evict: Option<EvictionListener<K, V>>) -> Result<Self> {
        if max_entries == 0 {
            return Err(Error::InvalidMaxEntries);
        }
        Ok(Self {
            max_entries,
            probation: IndexedList::new(),
            main: IndexedList::new(),
            on_evict,
        })
    }

    /// Insert or update a value.
    ///
    /// - key in main: recency refresh + overwrite.
    /// - key in probation: second touch, promoted into main with the new
    ///   value.
    /// - brand-new key: pushed into probation, washing out probation's
    ///   oldest entry if the queue is full.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(resident) = self.main.get_mut(&key) {
            *resident = value;
            self.main.move_to_front(&key);
            return;
        }

        if self.probation.remove(&key).is_some() {
            trace!("2q: second touch, promoting to main");
            self.admit_to_main(key, value);
            return;
        }

        if self.probation.len() == self.max_entries {
            if let Some((old_key, old_value)) = self.probation.pop_back() {
                trace!("2q: probation full, oldest entry washed out");
                if let Some(listener) = &mut self.on_evict {
                    listener(old_key, old_value);
                }
            }
        }
        self.probation.push_front(key, value);
    }

    /// Look up a key.
    ///
    /// A hit in main refreshes recency. A hit in probation is the second
    /// touch: the entry is promoted into main and returned.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.main.move_to_front(key) {
            return self.main.get(key);
        }

        if let Some(value) = self.probation.remove(key) {
            trace!("2q: second touch, promoting to main");
            self.admit_to_main(key.clone(), value);
            return self.main.get(key);
        }

        None
    }

    /// Remove a key from whichever queue holds it. The listener does not
    /// fire.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.main.remove(key).or_else(|| self.probation.remove(key))
    }

    /// Total resident entries across probation and main.
    pub fn len(&self) -> usize {
        self.probation.len() + self.main.len()
    }

    /// Whether both queues are empty.
    pub fn is_empty(&self) -> bool {
        self.probation.is_empty() && self.main.is_empty()
    }

    /// Empty both queues, reporting every resident entry to the listener.
    pub fn clear(&mut self) {
        if self.on_evict.is_some() {
            while let Some((key, value)) = self.probation.pop_back() {
                if let Some(listener) = &mut self.on_evict {
                    listener(key, value);
                }
            }
            while let Some((key, value)) = self.main.pop_back() {
                if let Some(listener) = &mut self.on_evict {
                    listener(key, value);
                }
            }
        }
        self.probation.clear();
        self.main.clear();
    }

    /// Push a promoted entry to the front of main, evicting main's
    /// recency victim if main is full.
    fn admit_to_main(&mut self, key: K, value: V) {
        if self.main.len() == self.max_entries {
            if let Some((old_key, old_value)) = self.main.pop_back() {
                trace!("2q: main full, recency victim evicted");
                if let Some(listener) = &mut self.on_evict {
                    listener(old_key, old_value);
                }
            }
        }
        self.main.push_front(key, value);
    }
}

impl<K, V> ReplacementPolicy<K, V> for TwoQueueCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) {
        TwoQueueCache::insert(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        TwoQueueCache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        TwoQueueCache::remove(self, key)
    }

    fn len(&self) -> usize {
        TwoQueueCache::len(self)
    }

    fn clear(&mut self) {
        TwoQueueCache::clear(self);
    }
}
