//! Cache replacement policy implementations.
//!
//! Every policy satisfies the same capability contract,
//! [`ReplacementPolicy`], and differs only in its eviction discipline:
//! - [`LruCache`] - plain recency
//! - [`LrukCache`] - K-th-access admission in front of a recency core
//! - [`TwoQueueCache`] - FIFO probation queue + promoted recency queue
//! - [`MultiQueueCache`] - frequency-tiered queue ladder with aging
//!
//! A consumer picks exactly one implementation; the policies share no
//! state and can be swapped behind the trait.

mod list;
mod lru;
mod lru_k;
mod multi_q;
mod two_q;

pub use list::{Entry, IndexedList};
pub use lru::LruCache;
pub use lru_k::LrukCache;
pub use multi_q::{MultiQueueCache, MultiQueueConfig};
pub use two_q::TwoQueueCache;

/// Callback invoked for each entry displaced by capacity pressure or by
/// `clear`.
///
/// Supplied through the `with_listener` constructors; never a global hook.
/// Runs synchronously, inline with the triggering `insert` or `clear`
/// call, and is never invoked for an explicit `remove`.
///
/// The `Send` bound keeps a policy instance movable across threads, so a
/// caller can still wrap the whole cache behind a lock.
pub type EvictionListener<K, V> = Box<dyn FnMut(K, V) + Send>;

/// The capability contract shared by all replacement policies.
///
/// Runtime operations never fail: a miss is `None`, a full cache evicts
/// its current candidate, and removing an absent key is a no-op.
///
/// All mutating operations take `&mut self`; instances are single-threaded
/// by design. A caller sharing one instance across threads wraps the whole
/// contract behind a lock (e.g. `parking_lot::Mutex`).
pub trait ReplacementPolicy<K, V> {
    /// Insert or update a key/value pair, evicting if at capacity.
    fn insert(&mut self, key: K, value: V);

    /// Look up a key, recording the access per the policy's bookkeeping.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Delete a key wherever it resides. The eviction listener does not
    /// fire; explicit removal is not eviction.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Number of resident entries. Pending-access counters and history
    /// tags are not resident and are excluded.
    fn len(&self) -> usize;

    /// Whether the cache holds no resident entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty all structures, invoking the eviction listener exactly once
    /// per resident entry, in unspecified order.
    fn clear(&mut self);
}
