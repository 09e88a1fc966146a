//! Local Cache Module
//!
//! The in-memory storage layer of a node: a byte-bounded LRU store with
//! TTL-based background expiry, and the thread-safe wrapper the rest of the
//! system goes through.
//!
//! ## Core Concepts
//! - **ByteView**: immutable, cheaply clonable value handed to callers.
//! - **LruStore**: single-threaded LRU with byte accounting; eviction from
//!   the least-recently-touched end whenever the budget is exceeded.
//! - **SharedCache**: one mutex over the store plus a background task that
//!   sweeps expired entries from the cold end of the recency list.

pub mod byteview;
pub mod lru;
pub mod shared;

pub use byteview::ByteView;
pub use lru::{EvictionCallback, LruStore};
pub use shared::{SharedCache, DEFAULT_SWEEP_INTERVAL};

#[cfg(test)]
mod tests;
