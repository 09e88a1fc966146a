//! Group Coordination Module
//!
//! The request-routing heart of the federation. A group is a named cache
//! namespace; its coordinator resolves every read through three paths in
//! order: local cache hit, fetch from the peer the ring says is
//! authoritative, or a fresh load from the caller-supplied origin.
//!
//! ## Core Concepts
//! - **Read-through only**: there is no write or delete API; the cache is
//!   populated exclusively by origin loads.
//! - **Single-flight**: concurrent misses on one key share a single load
//!   instead of stampeding the origin.
//! - **Peer fallback**: transport failures against a peer are logged and
//!   recovered by loading locally; they never fail a read on their own.
//!
//! ## Submodules
//! - **`coordinator`**: the `Group` type and the `Loader`/`PeerPicker`/
//!   `PeerClient` seams.
//! - **`registry`**: process-lifetime name -> group mapping.
//! - **`flight`**: per-key coalescing of concurrent loads.
//! - **`stats`**: read-path counters.

pub mod coordinator;
pub mod flight;
pub mod registry;
pub mod stats;

pub use coordinator::{FnLoader, Group, Loader, PeerClient, PeerPicker};
pub use flight::FlightGroup;
pub use registry::Registry;
pub use stats::{GroupStats, StatsSnapshot};
