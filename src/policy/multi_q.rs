//! MQ (Multi-Queue) replacement policy.
//!
//! Resident entries live in a ladder of recency queues `Q0..Qn-1` ranked
//! by access frequency: a key's tier is `floor(log2(frequency))`, capped
//! at the top tier. Hot keys climb the ladder and resist eviction from
//! bursts of cold traffic; a per-operation aging sweep demotes entries
//! that stop being touched, so no tier becomes immovable.
//!
//! Evicted keys leave a `{tier, frequency}` tag in a bounded history
//! queue. A key re-inserted while its tag is still in history re-enters at
//! its recorded tier instead of restarting cold in `Q0`.
//!
//! Time here is a logical clock advanced once per `insert`/`get` call, so
//! aging depends only on the operation sequence, never on wall-clock time.

use std::collections::HashMap;
use std::hash::Hash;

use log::trace;

use crate::common::config::{DEFAULT_HISTORY_CAPACITY, DEFAULT_LIFETIME, DEFAULT_NUM_QUEUES};
use crate::common::{Error, Result};
use crate::policy::list::IndexedList;
use crate::policy::{EvictionListener, ReplacementPolicy};

/// Construction-time tuning for [`MultiQueueCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiQueueConfig {
    /// Total resident entries across all tiers; 0 means no limit.
    pub max_entries: usize,

    /// Number of frequency tiers. Must be at least 1.
    pub num_queues: usize,

    /// Inactivity window, in logical-clock ticks, after which an entry is
    /// demoted one tier. Must be at least 1.
    pub lifetime: u64,

    /// Bound on the history queue of evicted-key tags; 0 means no limit.
    pub history_capacity: usize,
}

impl Default for MultiQueueConfig {
    fn default() -> Self {
        Self {
            max_entries: 0,
            num_queues: DEFAULT_NUM_QUEUES,
            lifetime: DEFAULT_LIFETIME,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MultiQueueConfig {
    /// Check the bounds that must be positive.
    ///
    /// # Errors
    /// [`Error::InvalidNumQueues`] or [`Error::InvalidLifetime`].
    pub fn validate(&self) -> Result<()> {
        if self.num_queues == 0 {
            return Err(Error::InvalidNumQueues);
        }
        if self.lifetime == 0 {
            return Err(Error::InvalidLifetime);
        }
        Ok(())
    }
}

/// Per-resident-key bookkeeping.
struct KeyState {
    /// Which tier currently holds the key.
    tier: usize,

    /// Accesses observed while resident (restored from history on
    /// re-admission).
    frequency: u64,

    /// Logical-clock reading at the last touch.
    last_access: u64,
}

/// What history remembers about an evicted key.
struct HistoryTag {
    tier: usize,
    frequency: u64,
}

/// A multi-queue cache: frequency-tiered recency queues with aging and
/// frequency-preserving re-admission.
///
/// # Structure
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                      MultiQueueCache                      │
/// │   Q3 (hottest)  front ⇄ ... ⇄ back   ▲ promote            │
/// │   Q2            front ⇄ ... ⇄ back   │ on frequency       │
/// │   Q1            front ⇄ ... ⇄ back   ▼ demote on          │
/// │   Q0 (coldest)  front ⇄ ... ⇄ back     staleness          │
/// │   ──────────────────────────────────                      │
/// │   history       {key, tier, freq} tags of evicted keys    │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// Eviction pops the back of the lowest non-empty tier.
///
/// # Example
/// ```
/// use swapcache::{MultiQueueCache, MultiQueueConfig};
///
/// let config = MultiQueueConfig { max_entries: 64, ..Default::default() };
/// let mut cache = MultiQueueCache::new(config).unwrap();
/// cache.insert("a", 1);
/// assert_eq!(cache.get(&"a"), Some(&1));
/// ```
pub struct MultiQueueCache<K, V> {
    config: MultiQueueConfig,

    /// One recency queue per tier, index 0 = coldest.
    tiers: Vec<IndexedList<K, V>>,

    /// Tier, frequency and last-touch tick per resident key.
    states: HashMap<K, KeyState>,

    /// Tags of recently evicted keys, most recent at the front.
    history: IndexedList<K, HistoryTag>,

    /// Logical clock, advanced once per `insert`/`get`.
    clock: u64,

    /// Optional callback for displaced entries.
    on_evict: Option<EvictionListener<K, V>>,
}

impl<K, V> MultiQueueCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new cache.
    ///
    /// # Errors
    /// [`Error::InvalidNumQueues`] or [`Error::InvalidLifetime`] for
    /// non-positive bounds in `config`.
    pub fn new(config: MultiQueueConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a new cache with an eviction listener.
    ///
    /// # Errors
    /// Same as [`MultiQueueCache::new`].
    pub fn with_listener(
        config: MultiQueueConfig,
        listener: EvictionListener<K, V>,
    ) -> Result<Self> {
        Self::build(config, Some(listener))
    }

    fn build(config: MultiQueueConfig, on_evict: Option<EvictionListener<K, V>>) -> Result<Self> {
        config.validate()?;
        let tiers = (0..config.num_queues).map(|_| IndexedList::new()).collect();
        Ok(Self {
            config,
            tiers,
            states: HashMap::new(),
            history: IndexedList::new(),
            clock: 0,
            on_evict,
        })
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &MultiQueueConfig {
        &self.config
    }

    /// Insert or update a value.
    ///
    /// A resident key is overwritten and treated as accessed (frequency
    /// bump, possible promotion). A key whose tag is still in history
    /// re-enters at its recorded tier with its recorded frequency. A cold
    /// key is admitted into `Q0`. Admission evicts from the back of the
    /// lowest non-empty tier while over capacity.
    pub fn insert(&mut self, key: K, value: V) {
        let now = self.tick();

        if let Some(tier) = self.states.get(&key).map(|s| s.tier) {
            if let Some(resident) = self.tiers[tier].get_mut(&key) {
                *resident = value;
            }
            self.record_access(&key, now);
            self.age(now);
            return;
        }

        // Frequency-preserving re-admission, or a cold start in Q0.
        let (tier, frequency) = match self.history.remove(&key) {
            Some(tag) => {
                trace!("mq: history re-admission into tier {}", tag.tier);
                (tag.tier.min(self.config.num_queues - 1), tag.frequency + 1)
            }
            None => (0, 1),
        };

        self.make_room();
        self.tiers[tier].push_front(key.clone(), value);
        self.states.insert(
            key,
            KeyState {
                tier,
                frequency,
                last_access: now,
            },
        );
        self.age(now);
    }

    /// Look up a key.
    ///
    /// A hit bumps the frequency counter, promotes across the tier
    /// threshold if crossed, and refreshes recency within the tier. A
    /// miss on a key still tagged in history refreshes the tag instead,
    /// so the access is not lost to the next re-admission.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.tick();

        if self.states.contains_key(key) {
            self.record_access(key, now);
            self.age(now);
            let tier = self.states.get(key)?.tier;
            return self.tiers[tier].get(key);
        }

        if let Some(tag) = self.history.get_mut(key) {
            tag.frequency += 1;
            self.history.move_to_front(key);
        }
        self.age(now);
        None
    }

    /// Remove a key from its tier and from history. The listener does not
    /// fire.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.history.remove(key);
        let state = self.states.remove(key)?;
        self.tiers[state.tier].remove(key)
    }

    /// Total resident entries across all tiers. History tags are not
    /// resident and are not counted.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Empty every tier and history, reporting each resident entry to the
    /// listener.
    pub fn clear(&mut self) {
        if self.on_evict.is_some() {
            for tier in 0..self.config.num_queues {
                while let Some((key, value)) = self.tiers[tier].pop_back() {
                    if let Some(listener) = &mut self.on_evict {
                        listener(key, value);
                    }
                }
            }
        }
        for tier in &mut self.tiers {
            tier.clear();
        }
        self.states.clear();
        self.history.clear();
        self.clock = 0;
    }

    // ========================================================================
    // Internal: clock, promotion, demotion, eviction
    // ========================================================================

    /// Advance the logical clock by one operation.
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Tier a key belongs in for a given frequency: `floor(log2(f))`,
    /// capped at the top tier. Frequencies 1, 2..3, 4..7, ... map to
    /// tiers 0, 1, 2, ...
    fn tier_for(&self, frequency: u64) -> usize {
        let log2 = (u64::BITS - 1 - frequency.max(1).leading_zeros()) as usize;
        log2.min(self.config.num_queues - 1)
    }

    /// Count an access to a resident key: frequency bump, promotion if
    /// the new frequency crosses the tier threshold, recency refresh
    /// otherwise.
    fn record_access(&mut self, key: &K, now: u64) {
        let (current, frequency) = match self.states.get_mut(key) {
            Some(state) => {
                state.frequency += 1;
                state.last_access = now;
                (state.tier, state.frequency)
            }
            None => return,
        };

        let target = self.tier_for(frequency);
        if target > current {
            if let Some(value) = self.tiers[current].remove(key) {
                self.tiers[target].push_front(key.clone(), value);
                if let Some(state) = self.states.get_mut(key) {
                    state.tier = target;
                }
                trace!("mq: promoted tier {current} -> {target}");
            }
        } else {
            self.tiers[current].move_to_front(key);
        }
    }

    /// Demote stale entries one step down the ladder.
    ///
    /// Each tier above Q0 has its back (least recent) entry checked; one
    /// idle past `lifetime` moves to the front of the next-lower tier
    /// with its frequency reset to that tier's floor, so it must re-earn
    /// promotion. At most one demotion per tier per operation keeps the
    /// sweep O(num_queues).
    fn age(&mut self, now: u64) {
        for tier in 1..self.config.num_queues {
            let Some((back_key, _)) = self.tiers[tier].back() else {
                continue;
            };
            let back_key = back_key.clone();
            let stale = self
                .states
                .get(&back_key)
                .is_some_and(|s| now.saturating_sub(s.last_access) > self.config.lifetime);
            if !stale {
                continue;
            }

            if let Some(value) = self.tiers[tier].remove(&back_key) {
                let lower = tier - 1;
                self.tiers[lower].push_front(back_key.clone(), value);
                if let Some(state) = self.states.get_mut(&back_key) {
                    state.tier = lower;
                    state.frequency = 1 << lower;
                    state.last_access = now;
                }
                trace!("mq: demoted stale entry tier {tier} -> {lower}");
            }
        }
    }

    /// Evict until the resident count is below `max_entries` (so one
    /// admission fits), recording each victim in history.
    fn make_room(&mut self) {
        if self.config.max_entries == 0 {
            return;
        }
        while self.states.len() >= self.config.max_entries {
            if !self.evict_one() {
                break;
            }
        }
    }

    /// Evict the back of the lowest non-empty tier. Returns `false` if
    /// every tier is empty.
    fn evict_one(&mut self) -> bool {
        let Some(tier) = self.tiers.iter().position(|q| !q.is_empty()) else {
            return false;
        };
        let Some((key, value)) = self.tiers[tier].pop_back() else {
            return false;
        };

        let frequency = self.states.remove(&key).map_or(1, |s| s.frequency);
        trace!("mq: evicting from tier {tier}, tagging history");
        self.push_history(key.clone(), HistoryTag { tier, frequency });

        if let Some(listener) = &mut self.on_evict {
            listener(key, value);
        }
        true
    }

    /// Record an evicted key's tag at the front of history, dropping
    /// history's own oldest tag if the queue is full.
    fn push_history(&mut self, key: K, tag: HistoryTag) {
        if self.config.history_capacity > 0 && self.history.len() == self.config.history_capacity {
            self.history.pop_back();
        }
        self.history.push_front(key, tag);
    }
}

impl<K, V> ReplacementPolicy<K, V> for MultiQueueCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) {
        MultiQueueCache::insert(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        MultiQueueCache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        MultiQueueCache::remove(self, key)
    }

    fn len(&self) -> usize {
        MultiQueueCache::len(self)
    }

    fn clear(&mut self) {
        MultiQueueCache::clear(self);
    }
}
