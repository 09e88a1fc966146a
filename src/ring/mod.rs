//! Consistent Hashing Module
//!
//! Maps arbitrary keys to one of N peer identifiers so that every node in
//! the federation independently computes the same owner for a key.
//!
//! ## Core Concepts
//! - **Virtual nodes**: each peer takes `replicas` positions on the ring to
//!   smooth the load across peers.
//! - **Clockwise successor**: a key belongs to the node owning the first
//!   ring position at or after the key's hash.
//! - **Wholesale rebuild**: peer-set changes construct a fresh ring and swap
//!   it in, avoiding intermediate inconsistent states under concurrent
//!   reads.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing, DEFAULT_REPLICAS};
