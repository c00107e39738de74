//! swapcache - swappable in-memory cache replacement policies.
//!
//! # Architecture
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          swapcache                             │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │         Capability Contract (ReplacementPolicy)          │  │
//! │  │            insert | get | remove | len | clear           │  │
//! │  │                + optional EvictionListener               │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! │          ▲              ▲              ▲              ▲        │
//! │  ┌───────┴────┐  ┌──────┴─────┐  ┌─────┴──────┐  ┌────┴─────┐  │
//! │  │  LruCache  │  │ LrukCache  │  │ TwoQueue   │  │ MultiQ   │  │
//! │  │  recency   │  │ K-access   │  │ probation  │  │ tiered   │  │
//! │  │  eviction  │  │ admission  │  │ + main     │  │ + aging  │  │
//! │  └────────────┘  └────────────┘  └────────────┘  └──────────┘  │
//! │          ▼              ▼              ▼              ▼        │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │         IndexedList (ordered list + key index)           │  │
//! │  │     push-front | move-to-front | remove | pop-back       │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each policy bounds its resident entries to a configured capacity and
//! differs only in which entry it sacrifices under pressure:
//! - [`LruCache`] evicts the least recently touched entry.
//! - [`LrukCache`] additionally refuses admission until a key has been
//!   accessed K times, screening out one-off scans.
//! - [`TwoQueueCache`] parks first-touch entries in a FIFO probation
//!   queue and only promotes them into the recency-managed main queue on
//!   a second touch.
//! - [`MultiQueueCache`] ranks entries into frequency tiers, demotes
//!   stale ones, and remembers evicted keys' standing in a history queue.
//!
//! # Modules
//! - [`common`] - Error type, result alias, default tuning constants
//! - [`policy`] - The four policies and their shared building blocks
//!
//! # Quick Start
//! ```
//! use swapcache::LruCache;
//!
//! let mut cache = LruCache::new(128);
//! cache.insert("config", "value");
//! assert_eq!(cache.get(&"config"), Some(&"value"));
//! assert_eq!(cache.len(), 1);
//! ```
//!
//! # Scope
//! The policies are pure, single-threaded data structures meant to be
//! embedded in a larger cache-consuming component. There is no
//! persistence, no internal locking and no background work; callers that
//! share an instance across threads serialize access themselves (e.g.
//! behind a `Mutex`).

pub mod common;
pub mod policy;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, Result};
pub use policy::{
    Entry, EvictionListener, IndexedList, LruCache, LrukCache, MultiQueueCache, MultiQueueConfig,
    ReplacementPolicy, TwoQueueCache,
};
