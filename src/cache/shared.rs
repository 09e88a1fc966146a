//! Thread-safe wrapper around the LRU store.
//!
//! A single mutex guards both the index map and the recency list; every
//! `get` takes it because a hit mutates recency. The wrapper also owns the
//! background expiry sweeper, since the raw store cannot be shared.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::byteview::ByteView;
use super::lru::LruStore;

/// Default tick for the background expiry sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Mutex-guarded LRU store with lazy construction and a background sweeper.
///
/// The store itself is built on first `add`, so an untouched cache costs
/// nothing beyond the sweeper task. Dropping the wrapper (or calling
/// [`SharedCache::stop`]) shuts the sweeper down.
pub struct SharedCache {
    max_bytes: u64,
    store: Arc<Mutex<Option<LruStore>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl SharedCache {
    /// Creates a cache with the given byte budget and the default sweep
    /// interval. Must be called from within a tokio runtime.
    pub fn new(max_bytes: u64) -> Self {
        Self::new_with_sweep_interval(max_bytes, DEFAULT_SWEEP_INTERVAL)
    }

    /// Creates a cache sweeping for expired entries at a custom interval.
    pub fn new_with_sweep_interval(max_bytes: u64, sweep_interval: Duration) -> Self {
        let store: Arc<Mutex<Option<LruStore>>> = Arc::new(Mutex::new(None));
        let sweeper = tokio::spawn(sweep_loop(store.clone(), sweep_interval));
        Self {
            max_bytes,
            store,
            sweeper: Mutex::new(Some(sweeper)),
        }
    }

    /// Inserts a value, constructing the store on first use.
    pub fn add(&self, key: &str, value: ByteView, ttl: Option<Duration>) {
        let mut guard = self.store.lock();
        let store = guard.get_or_insert_with(|| LruStore::new(self.max_bytes));
        store.add(key, value, ttl);
    }

    /// Looks up a value; a cache that was never written to always misses.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.store.lock();
        guard.as_mut()?.get(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.store.lock().as_ref().map_or(0, LruStore::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accounted size of the live entries in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.store.lock().as_ref().map_or(0, LruStore::used_bytes)
    }

    /// Shuts down the background sweeper. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for SharedCache {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn sweep_loop(store: Arc<Mutex<Option<LruStore>>>, sweep_interval: Duration) {
    let mut ticker = tokio::time::interval(sweep_interval);
    loop {
        ticker.tick().await;
        // The lock is held only for the removal itself; no I/O under it.
        let removed = {
            let mut guard = store.lock();
            guard
                .as_mut()
                .map_or(0, |store| store.remove_expired(Instant::now()))
        };
        if removed > 0 {
            debug!("expiry sweep removed {} entries", removed);
        }
    }
}
