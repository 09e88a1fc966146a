//! Consistent-hash ring with virtual nodes.
//!
//! Each peer occupies `replicas` synthetic positions on a ring of `u32`
//! hashes; a key maps to the node owning the first position at or after the
//! key's hash, wrapping around. The ring is rebuilt wholesale on peer-set
//! changes rather than mutated in place.

use std::collections::HashMap;

/// Hash function mapping bytes onto the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default number of virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Deterministic key -> node mapping over a set of peers.
pub struct HashRing {
    replicas: usize,
    hash: HashFn,
    hashes: Vec<u32>,
    nodes: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring using CRC-32 as the position hash.
    ///
    /// CRC-32 is cheap and distributes well enough for load smoothing; it
    /// is not a security property.
    pub fn new(replicas: usize) -> Self {
        Self::new_with_hash(replicas, crc32)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn new_with_hash(replicas: usize, hash: HashFn) -> Self {
        assert!(replicas > 0, "replicas must be greater than 0");
        Self {
            replicas,
            hash,
            hashes: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    /// Adds nodes to the ring, giving each `replicas` virtual positions.
    ///
    /// The position of virtual node `i` of node `n` is the hash of the
    /// decimal index concatenated with the node name. Colliding positions
    /// across nodes are last-writer-wins in the mapping; both positions stay
    /// on the ring.
    pub fn add<S: AsRef<str>>(&mut self, nodes: &[S]) {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.hashes.push(position);
                self.nodes.insert(position, node.to_string());
            }
        }
        self.hashes.sort_unstable();
    }

    /// Maps a key to its owning node: the clockwise successor of the key's
    /// hash, wrapping to the first position. `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.hashes.is_empty() {
            return None;
        }
        let target = (self.hash)(key.as_bytes());
        let idx = self.hashes.partition_point(|&position| position < target);
        let position = if idx == self.hashes.len() {
            self.hashes[0]
        } else {
            self.hashes[idx]
        };
        self.nodes.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
