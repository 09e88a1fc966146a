//! Name -> group registry.
//!
//! Groups are registered at startup and read during serving; the registry
//! owns them for the life of the process. State is an explicit object,
//! injected where it is needed, rather than a hidden global.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::cache::DEFAULT_SWEEP_INTERVAL;

use super::coordinator::{Group, Loader};

pub struct Registry {
    groups: DashMap<String, Arc<Group>>,
    sweep_interval: Duration,
}

impl Registry {
    pub fn new() -> Self {
        Self::new_with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Creates a registry whose groups sweep expired entries at the given
    /// interval.
    pub fn new_with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            groups: DashMap::new(),
            sweep_interval,
        }
    }

    /// Creates and registers a group whose loaded values never age out.
    ///
    /// Registering a name twice replaces the previous binding.
    pub fn new_group(&self, name: &str, max_bytes: u64, loader: Arc<dyn Loader>) -> Arc<Group> {
        self.new_group_with_ttl(name, max_bytes, None, loader)
    }

    /// Creates and registers a group applying `ttl` to origin-loaded
    /// values. `None` means values are only ever LRU-evicted.
    pub fn new_group_with_ttl(
        &self,
        name: &str,
        max_bytes: u64,
        ttl: Option<Duration>,
        loader: Arc<dyn Loader>,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(
            name,
            max_bytes,
            ttl,
            self.sweep_interval,
            loader,
        ));
        self.groups.insert(name.to_string(), group.clone());
        group
    }

    /// Looks up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// All registered groups, for stats reporting.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        self.groups
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
