//! Byte-bounded LRU store with TTL metadata.
//!
//! Entries live in a slab-backed doubly-linked list threaded from most- to
//! least-recently-touched, with a `HashMap` index for O(1) lookup. Not safe
//! for concurrent access; `shared.rs` provides the lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::byteview::ByteView;

/// Invoked with the key and value of every entry removed by eviction or
/// expiry.
pub type EvictionCallback = Box<dyn FnMut(&str, &ByteView) + Send>;

struct Entry {
    key: String,
    value: ByteView,
    expires_at: Option<Instant>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Entry {
    fn cost(&self) -> u64 {
        (self.key.len() + self.value.len()) as u64
    }
}

/// Bounded, size-accounted, recency-ordered key/value store.
///
/// `used_bytes` always equals the sum of `key.len() + value.len()` over the
/// live entries, and never exceeds `max_bytes` after an `add` returns
/// (unless `max_bytes` is 0, which disables eviction).
pub struct LruStore {
    max_bytes: u64,
    used_bytes: u64,
    index: HashMap<String, usize>,
    slots: Vec<Option<Entry>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<EvictionCallback>,
}

impl LruStore {
    /// Creates a store with the given byte budget; 0 disables eviction.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            index: HashMap::new(),
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
            on_evicted: None,
        }
    }

    /// Creates a store that reports every removal to `on_evicted`.
    pub fn new_with_eviction(max_bytes: u64, on_evicted: EvictionCallback) -> Self {
        let mut store = Self::new(max_bytes);
        store.on_evicted = Some(on_evicted);
        store
    }

    /// Inserts or updates a value, promoting it to the front.
    ///
    /// A zero or absent `ttl` means the entry never expires by age. After
    /// the write, entries are evicted from the back until the store is
    /// within budget.
    pub fn add(&mut self, key: &str, value: ByteView, ttl: Option<Duration>) {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| Instant::now() + ttl);

        if let Some(&idx) = self.index.get(key) {
            if let Some(entry) = self.slots[idx].as_mut() {
                self.used_bytes += value.len() as u64;
                self.used_bytes -= entry.value.len() as u64;
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.move_to_front(idx);
        } else {
            let idx = self.alloc_slot();
            let entry = Entry {
                key: key.to_string(),
                value,
                expires_at,
                prev: None,
                next: self.head,
            };
            self.used_bytes += entry.cost();
            self.slots[idx] = Some(entry);

            if let Some(head_idx) = self.head {
                if let Some(head) = self.slots[head_idx].as_mut() {
                    head.prev = Some(idx);
                }
            }
            self.head = Some(idx);
            if self.tail.is_none() {
                self.tail = Some(idx);
            }
            self.index.insert(key.to_string(), idx);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Looks up a value, promoting it to the front on a hit.
    ///
    /// Expiry is not checked here; a just-expired entry may still be served
    /// until the next sweep removes it.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|entry| entry.value.clone())
    }

    /// Removes the least-recently-touched entry, if any.
    pub fn remove_oldest(&mut self) {
        if let Some(tail_idx) = self.tail {
            self.remove_slot(tail_idx);
        }
    }

    /// Removes expired entries walking from the back, stopping at the first
    /// entry that has not expired.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some(tail_idx) = self.tail {
            let expired = self.slots[tail_idx]
                .as_ref()
                .and_then(|entry| entry.expires_at)
                .map_or(false, |deadline| deadline <= now);
            if !expired {
                break;
            }
            self.remove_slot(tail_idx);
            removed += 1;
        }
        removed
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current accounted size: Σ (key length + value length).
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    fn remove_slot(&mut self, idx: usize) {
        self.unlink(idx);
        if let Some(entry) = self.slots[idx].take() {
            self.index.remove(&entry.key);
            self.used_bytes -= entry.cost();
            self.free_list.push(idx);
            if let Some(on_evicted) = self.on_evicted.as_mut() {
                on_evicted(&entry.key, &entry.value);
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = self.head;
        }
        if let Some(head_idx) = self.head {
            if let Some(head) = self.slots[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = self.slots[prev_idx].as_mut() {
                    prev_entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_idx) => {
                if let Some(next_entry) = self.slots[next_idx].as_mut() {
                    next_entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(None);
            idx
        }
    }
}
