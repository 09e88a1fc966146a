//! Distributed In-Memory Cache Federation Library
//!
//! This library crate defines the building blocks of a read-through cache
//! spread across peer nodes. It serves as the foundation for the node
//! binary (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`cache`**: The local storage layer. A byte-bounded LRU store with
//!   TTL-based background expiry behind a single mutex.
//! - **`ring`**: The placement layer. A consistent-hash ring with virtual
//!   nodes that deterministically maps every key to one peer.
//! - **`group`**: The coordination layer. Named cache namespaces that
//!   resolve reads through local cache, owning peer, and origin loader,
//!   with per-key single-flight on misses.
//! - **`http`**: The transport layer. Axum handlers serving peer fetches
//!   and the reqwest-based client performing them.

pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod http;
pub mod ring;
