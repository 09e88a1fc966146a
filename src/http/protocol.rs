//! Peer Wire Protocol
//!
//! Constants and DTOs of the HTTP surface between peers. A value fetch is
//! `GET <base>/<group>/<key>` with percent-encoded path segments; the
//! response body is the raw value bytes.

use serde::{Deserialize, Serialize};

use crate::group::StatsSnapshot;

/// Path prefix under which peer fetches are served.
pub const DEFAULT_BASE_PATH: &str = "/groupCache";

/// Content type of a successful value response.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Endpoint exposing per-group counters as JSON.
pub const ENDPOINT_STATS: &str = "/stats";

/// Counters for one group, as served by the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStatsEntry {
    /// Group name as it appears in the wire path.
    pub name: String,
    /// Live entries in the local cache.
    pub entries: usize,
    /// Accounted bytes in the local cache.
    pub used_bytes: u64,
    /// Read-path counters.
    pub stats: StatsSnapshot,
}

/// Response shape of the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatsResponse {
    pub groups: Vec<GroupStatsEntry>,
}
