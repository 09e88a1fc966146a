//! Peer pool: ring plus per-peer HTTP clients.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::group::{PeerClient, PeerPicker};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

use super::client::HttpPeer;
use super::protocol::DEFAULT_BASE_PATH;

/// Tunables of an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct HttpPoolOptions {
    /// Wire path prefix shared by every node in the federation.
    pub base_path: String,
    /// Virtual nodes per peer on the ring.
    pub replicas: usize,
    /// Per-request timeout for peer fetches.
    pub fetch_timeout: Duration,
    /// Attempts per peer fetch before reporting failure.
    pub fetch_attempts: usize,
}

impl Default for HttpPoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            fetch_timeout: Duration::from_millis(500),
            fetch_attempts: 3,
        }
    }
}

/// Picks the peer authoritative for a key and hands out its HTTP client.
///
/// `set_peers` rebuilds the ring and the client map wholesale under the
/// write lock; readers see either the old set or the new one, never a
/// partial state.
pub struct HttpPool {
    self_url: String,
    options: HttpPoolOptions,
    client: reqwest::Client,
    state: RwLock<PoolState>,
}

struct PoolState {
    ring: HashRing,
    peers: HashMap<String, Arc<HttpPeer>>,
}

impl HttpPool {
    /// `self_url` is this node's own peer address, e.g.
    /// `http://10.0.0.1:8001`. It is used to recognize when the ring picks
    /// this node itself.
    pub fn new(self_url: &str) -> Self {
        Self::new_with_options(self_url, HttpPoolOptions::default())
    }

    pub fn new_with_options(self_url: &str, options: HttpPoolOptions) -> Self {
        let state = PoolState {
            ring: HashRing::new(options.replicas),
            peers: HashMap::new(),
        };
        Self {
            self_url: self_url.trim_end_matches('/').to_string(),
            options,
            client: reqwest::Client::new(),
            state: RwLock::new(state),
        }
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    /// Replaces the peer set. The list should include this node's own
    /// address so every node computes the same ownership map.
    pub fn set_peers<S: AsRef<str>>(&self, peers: &[S]) {
        let peers: Vec<String> = peers
            .iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = HashRing::new(self.options.replicas);
        ring.add(&peers);

        let clients = peers
            .iter()
            .map(|peer| {
                let http_peer = Arc::new(HttpPeer::new(
                    self.client.clone(),
                    format!("{}{}", peer, self.options.base_path),
                    self.options.fetch_timeout,
                    self.options.fetch_attempts,
                ));
                (peer.clone(), http_peer)
            })
            .collect();

        let mut state = self.state.write();
        state.ring = ring;
        state.peers = clients;
        info!("peer set updated: {} peers", peers.len());
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>> {
        let state = self.state.read();
        let owner = state.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }
        debug!("picked peer {} for {}", owner, key);
        state
            .peers
            .get(owner)
            .cloned()
            .map(|peer| peer as Arc<dyn PeerClient>)
    }
}
