//! Default tuning constants for swapcache.

/// Default number of frequency tiers in an MQ cache.
///
/// Eight tiers cover access frequencies up to 2^8 with the log2 promotion
/// ladder; beyond that, hot keys all land in the top tier anyway.
pub const DEFAULT_NUM_QUEUES: usize = 8;

/// Default MQ inactivity window, in logical-clock ticks.
///
/// The clock advances once per `insert`/`get` call, so a lifetime of 32
/// means "demote an entry that sat untouched through 32 cache operations".
pub const DEFAULT_LIFETIME: u64 = 32;

/// Default bound on the MQ history queue.
///
/// History holds only `{tier, frequency}` tags, not values, so it can
/// afford to be larger than the resident set.
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;
