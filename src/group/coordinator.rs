//! Group coordinator: the public read API of a cache namespace.
//!
//! A group answers `get` by consulting the local cache, then the peer
//! authoritative for the key, then the caller-supplied origin loader.
//! Only origin loads populate the local cache; values fetched from a peer
//! are already cached on the owning node.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::{ByteView, SharedCache};
use crate::error::{CacheError, Result};

use super::flight::FlightGroup;
use super::stats::{GroupStats, StatsSnapshot};

/// Produces the authoritative bytes for a key when no cache has a copy.
///
/// Implementations are user-provided; the cache never inspects the bytes.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapter turning a plain closure into a [`Loader`].
pub struct FnLoader<F>(F);

impl<F> FnLoader<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(load: F) -> Self {
        Self(load)
    }
}

#[async_trait]
impl<F> Loader for FnLoader<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

/// Handle to a remote peer, able to fetch a group value over the wire.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn fetch(&self, group: &str, key: &str) -> Result<Bytes>;
}

/// Chooses the peer authoritative for a key.
///
/// Returns `None` when the ring is empty or when the ring selects this
/// node itself, meaning the key is served locally.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>>;
}

/// A named cache namespace with its own origin loader and byte budget.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    cache: SharedCache,
    ttl: Option<Duration>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flight: FlightGroup,
    stats: GroupStats,
}

impl Group {
    pub(crate) fn new(
        name: &str,
        max_bytes: u64,
        ttl: Option<Duration>,
        sweep_interval: Duration,
        loader: Arc<dyn Loader>,
    ) -> Self {
        Self {
            name: name.to_string(),
            loader,
            cache: SharedCache::new_with_sweep_interval(max_bytes, sweep_interval),
            ttl,
            peers: OnceLock::new(),
            flight: FlightGroup::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group's local cache, exposed for inspection.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Point-in-time read-path counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Installs the peer picker. A group accepts exactly one; a second
    /// registration is a programming error.
    ///
    /// # Panics
    /// Panics if a picker was already registered.
    pub fn register_peer_picker(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peer_picker called more than once");
        }
    }

    /// Looks up a value: local cache, then the owning peer, then the origin
    /// loader.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        self.stats.record_get();
        if let Some(value) = self.cache.get(key) {
            debug!("cache hit for {} in group {}", key, self.name);
            self.stats.record_hit();
            return Ok(value);
        }

        self.load(key).await
    }

    /// Resolves a miss under per-key single-flight, so a thundering herd on
    /// one key performs one load.
    async fn load(&self, key: &str) -> Result<ByteView> {
        self.flight
            .run(key, async {
                if let Some(picker) = self.peers.get() {
                    if let Some(peer) = picker.pick_peer(key) {
                        self.stats.record_peer_fetch();
                        match peer.fetch(&self.name, key).await {
                            Ok(bytes) => return Ok(ByteView::from(bytes)),
                            Err(e) => {
                                // Peer trouble is never fatal to a read;
                                // fall through to the origin.
                                self.stats.record_peer_error();
                                warn!(
                                    "failed to fetch {} from peer for group {}: {}",
                                    key, self.name, e
                                );
                            }
                        }
                    }
                }
                self.load_locally(key).await
            })
            .await
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();
        let bytes = self.loader.load(key).await.map_err(|e| {
            self.stats.record_load_error();
            CacheError::Load(e.to_string())
        })?;
        let value = ByteView::from(bytes);
        self.cache.add(key, value.clone(), self.ttl);
        Ok(value)
    }
}
