//! HTTP Transport Module
//!
//! The network surface of a node: the server side answering peer fetches
//! and the client side performing them.
//!
//! ## Core Concepts
//! - **One protocol for everyone**: a peer fetch hits the same handler a
//!   client would; the receiving node runs the full read path on its side.
//! - **Pool**: the `HttpPool` owns the consistent-hash ring and one HTTP
//!   client handle per peer, and implements `PeerPicker` for the groups.
//! - **Fallback over failure**: the client retries with backoff, and a
//!   fetch that still fails is recovered by the coordinator's local load.
//!
//! ## Submodules
//! - **`handlers`**: Axum request handlers and router assembly.
//! - **`client`**: `HttpPeer`, the outbound fetch with retry.
//! - **`pool`**: peer-set management and peer picking.
//! - **`protocol`**: wire constants and stats DTOs.

pub mod client;
pub mod handlers;
pub mod pool;
pub mod protocol;

pub use client::HttpPeer;
pub use handlers::peer_router;
pub use pool::{HttpPool, HttpPoolOptions};
pub use protocol::DEFAULT_BASE_PATH;

#[cfg(test)]
mod tests;
