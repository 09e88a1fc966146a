//! Error types for the cache federation.
//!
//! A single enum covers every failure a read can surface, with a direct
//! mapping onto the HTTP status codes of the peer wire protocol.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Unified error type for cache reads.
///
/// The enum is `Clone` so an in-flight load result can be broadcast to
/// every caller waiting on the same key.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The caller asked for the empty key.
    #[error("key is required")]
    EmptyKey,

    /// No group registered under the requested name.
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Contacting a remote peer failed. Recovered by falling back to the
    /// origin loader; only surfaces when no fallback is possible.
    #[error("peer fetch failed: {0}")]
    PeerFetch(String),

    /// The origin loader reported an error. The message is the loader's own.
    #[error("{0}")]
    Load(String),
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            CacheError::PeerFetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
