//! Peer API Handlers
//!
//! HTTP endpoints exposing a node's groups to the rest of the federation.
//! These handlers translate requests into `Group::get` calls; the group
//! runs the same local -> peer -> origin logic whether the caller is a
//! client or another node.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

use crate::error::CacheError;
use crate::group::Registry;

use super::protocol::{
    GroupStatsEntry, NodeStatsResponse, CONTENT_TYPE_OCTET_STREAM, ENDPOINT_STATS,
};

/// Builds the node router: `GET <base>/:group/:key` for peer fetches and
/// `GET /stats` for counters.
///
/// Paths under the base that do not name exactly a group and a key are
/// rejected with 400; paths outside the base 404.
pub fn peer_router(registry: Arc<Registry>, base_path: &str) -> Router {
    let base = base_path.trim_end_matches('/').to_string();
    Router::new()
        .route(&format!("{}/:group/:key", base), get(handle_fetch))
        .route(ENDPOINT_STATS, get(handle_stats))
        .fallback(move |uri: Uri| handle_unmatched(uri, base.clone()))
        .layer(Extension(registry))
}

/// Serves one value as an octet-stream.
///
/// 404 when the group does not exist, 500 with the error message when the
/// read fails.
pub async fn handle_fetch(
    Extension(registry): Extension<Arc<Registry>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Response {
    let Some(group) = registry.get_group(&group_name) else {
        return CacheError::NoSuchGroup(group_name).into_response();
    };

    match group.get(&key).await {
        Ok(value) => (
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            value.into_bytes(),
        )
            .into_response(),
        Err(e) => {
            error!("failed to serve {}/{}: {}", group.name(), key, e);
            e.into_response()
        }
    }
}

/// Rejects requests no route matched: malformed paths under the wire
/// prefix are client errors, everything else is unknown.
pub async fn handle_unmatched(uri: Uri, base_path: String) -> Response {
    if uri.path().starts_with(&format!("{}/", base_path)) {
        (StatusCode::BAD_REQUEST, "bad request").into_response()
    } else {
        (StatusCode::NOT_FOUND, "not found").into_response()
    }
}

/// Reports per-group cache sizes and read-path counters.
pub async fn handle_stats(
    Extension(registry): Extension<Arc<Registry>>,
) -> Json<NodeStatsResponse> {
    let groups = registry
        .groups()
        .into_iter()
        .map(|group| GroupStatsEntry {
            name: group.name().to_string(),
            entries: group.cache().len(),
            used_bytes: group.cache().used_bytes(),
            stats: group.stats(),
        })
        .collect();

    Json(NodeStatsResponse { groups })
}
