//! Error types for swapcache.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in swapcache.
///
/// The taxonomy is narrow: every variant is a construction-time
/// misconfiguration. Runtime operations (`insert`, `get`, `remove`, `len`,
/// `clear`) never fail; a miss is reported through `Option`, not an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A 2Q cache needs a positive bound for each of its two queues.
    #[error("invalid configuration: max_entries must be greater than 0")]
    InvalidMaxEntries,

    /// An LRU-K cache admits a key after K observed accesses; K = 0 would
    /// admit nothing, ever.
    #[error("invalid configuration: k must be at least 1")]
    InvalidK,

    /// An MQ cache needs at least one tier to hold entries.
    #[error("invalid configuration: num_queues must be at least 1")]
    InvalidNumQueues,

    /// An MQ cache demotes entries idle for `lifetime` ticks; a zero
    /// window would demote on every operation.
    #[error("invalid configuration: lifetime must be at least 1 tick")]
    InvalidLifetime,
}
