//! Per-key coalescing of concurrent loads.
//!
//! When several callers miss on the same key at once, only the first runs
//! the load; the rest subscribe to its result. The in-flight entry is
//! removed as soon as the load completes, so later misses start fresh.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};

pub struct FlightGroup {
    inflight: Mutex<HashMap<String, broadcast::Sender<Result<ByteView>>>>,
}

impl FlightGroup {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `load` for `key`, sharing one execution among concurrent calls.
    ///
    /// The first caller for a key executes the future and broadcasts the
    /// result; callers arriving while it is in flight await that broadcast
    /// instead. If the executing caller is cancelled, waiters observe a
    /// closed channel and report a load error rather than hanging.
    pub async fn run<F>(&self, key: &str, load: F) -> Result<ByteView>
    where
        F: Future<Output = Result<ByteView>>,
    {
        let waiter = {
            let mut inflight = self.inflight.lock();
            match inflight.get(key) {
                Some(sender) => Some(sender.subscribe()),
                None => {
                    let (sender, _) = broadcast::channel(1);
                    inflight.insert(key.to_string(), sender);
                    None
                }
            }
        };

        if let Some(mut receiver) = waiter {
            return match receiver.recv().await {
                Ok(result) => result,
                Err(_) => Err(CacheError::Load(format!(
                    "in-flight load for {} was dropped",
                    key
                ))),
            };
        }

        // Clear the entry even if this future is dropped mid-load, so the
        // key does not stay wedged.
        let mut guard = FlightGuard {
            flight: self,
            key,
            armed: true,
        };
        let result = load.await;
        if let Some(sender) = self.inflight.lock().remove(key) {
            let _ = sender.send(result.clone());
        }
        // The entry is gone; a disarmed guard cannot remove a successor
        // registered for the same key in the meantime.
        guard.armed = false;
        result
    }
}

impl Default for FlightGroup {
    fn default() -> Self {
        Self::new()
    }
}

struct FlightGuard<'a> {
    flight: &'a FlightGroup,
    key: &'a str,
    armed: bool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flight.inflight.lock().remove(self.key);
        }
    }
}
