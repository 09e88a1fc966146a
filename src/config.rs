//! Node configuration.
//!
//! Tunables are read from environment variables with sensible defaults;
//! addresses and peer lists come from the command line (see `main.rs`).

use std::env;

/// Per-node tuning parameters.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// LRU byte budget per group cache; 0 disables eviction
    pub max_cache_bytes: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// Virtual nodes per peer on the consistent-hash ring
    pub ring_replicas: usize,
    /// Per-request timeout for peer fetches in milliseconds
    pub peer_timeout_ms: u64,
    /// Attempts per peer fetch before giving up
    pub peer_retry_attempts: usize,
}

impl NodeConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_BYTES` - LRU byte budget (default: 64 MiB)
    /// - `SWEEP_INTERVAL_SECS` - expiry sweep interval (default: 1)
    /// - `RING_REPLICAS` - virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - peer fetch timeout (default: 500)
    /// - `PEER_RETRY_ATTEMPTS` - peer fetch attempts (default: 3)
    pub fn from_env() -> Self {
        Self {
            max_cache_bytes: env::var("MAX_CACHE_BYTES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(64 * 1024 * 1024),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(1),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(50),
            peer_timeout_ms: env::var("PEER_TIMEOUT_MS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(500),
            peer_retry_attempts: env::var("PEER_RETRY_ATTEMPTS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3),
        }
    }
}
