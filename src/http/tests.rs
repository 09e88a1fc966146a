use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::group::coordinator::PeerClient;
use crate::group::{FnLoader, Loader, PeerPicker, Registry};
use crate::http::protocol::{DEFAULT_BASE_PATH, NodeStatsResponse};
use crate::http::{peer_router, HttpPeer, HttpPool, HttpPoolOptions};
use crate::ring::HashRing;

struct CountingScores {
    db: HashMap<&'static str, &'static str>,
    loads: AtomicUsize,
}

impl CountingScores {
    fn new() -> Self {
        let mut db = HashMap::new();
        db.insert("Tom", "630");
        db.insert("Jack", "589");
        db.insert("Sam", "567");
        Self {
            db,
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Loader for CountingScores {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        match self.db.get(key) {
            Some(value) => {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Ok(value.as_bytes().to_vec())
            }
            None => Err(anyhow::anyhow!("{} not exist", key)),
        }
    }
}

async fn spawn_node(registry: Arc<Registry>) -> SocketAddr {
    let app = peer_router(registry, DEFAULT_BASE_PATH);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn scores_registry() -> (Arc<Registry>, Arc<CountingScores>) {
    let registry = Arc::new(Registry::new());
    let loader = Arc::new(CountingScores::new());
    registry.new_group("scores", 2048, loader.clone());
    (registry, loader)
}

#[tokio::test]
async fn test_fetch_value_over_http() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}{}/scores/Tom", addr, DEFAULT_BASE_PATH);
    let response = reqwest::get(&url).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap(),
        "application/octet-stream"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"630");
}

#[tokio::test]
async fn test_unknown_group_is_not_found() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}{}/ratings/Tom", addr, DEFAULT_BASE_PATH);
    let response = reqwest::get(&url).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("no such group"));
}

#[tokio::test]
async fn test_failed_load_is_internal_error() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}{}/scores/unknown", addr, DEFAULT_BASE_PATH);
    let response = reqwest::get(&url).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().contains("not exist"));
}

#[tokio::test]
async fn test_malformed_path_is_bad_request() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}{}/scores", addr, DEFAULT_BASE_PATH);
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let url = format!("http://{}{}/a/b/c", addr, DEFAULT_BASE_PATH);
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_path_outside_prefix_is_rejected() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}/other/scores/Tom", addr);
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_endpoint_reports_groups() {
    let (registry, _loader) = scores_registry();
    let addr = spawn_node(registry).await;

    let url = format!("http://{}{}/scores/Tom", addr, DEFAULT_BASE_PATH);
    reqwest::get(&url).await.unwrap();

    let stats_url = format!("http://{}/stats", addr);
    let body = reqwest::get(&stats_url).await.unwrap().text().await.unwrap();
    let stats: NodeStatsResponse = serde_json::from_str(&body).unwrap();

    assert_eq!(stats.groups.len(), 1);
    let entry = &stats.groups[0];
    assert_eq!(entry.name, "scores");
    assert_eq!(entry.entries, 1);
    assert!(entry.used_bytes > 0);
    assert_eq!(entry.stats.gets, 1);
    assert_eq!(entry.stats.loads, 1);
}

#[tokio::test]
async fn test_peer_client_roundtrips_awkward_keys() {
    let registry = Arc::new(Registry::new());
    registry.new_group(
        "echo",
        2048,
        Arc::new(FnLoader::new(|key: &str| Ok(key.as_bytes().to_vec()))),
    );
    let addr = spawn_node(registry).await;

    let peer = HttpPeer::new(
        reqwest::Client::new(),
        format!("http://{}{}", addr, DEFAULT_BASE_PATH),
        Duration::from_secs(1),
        1,
    );

    // Keys with separators and reserved characters must survive the wire.
    for key in ["plain", "with space", "a/b", "q?x=1", "frag#ment"] {
        let bytes = peer.fetch("echo", key).await.unwrap();
        assert_eq!(bytes.as_ref(), key.as_bytes());
    }
}

#[tokio::test]
async fn test_pick_peer_matches_ring() {
    let p1 = "http://127.0.0.1:8001";
    let p2 = "http://127.0.0.1:8002";

    let pool = HttpPool::new(p1);
    pool.set_peers(&[p1, p2]);

    let mut ring = HashRing::new(HttpPoolOptions::default().replicas);
    ring.add(&[p1, p2]);

    for key in ["Tom", "Jack", "Sam", "another-key"] {
        let owner = ring.get(key).unwrap();
        let picked = pool.pick_peer(key);
        if owner == p2 {
            assert!(picked.is_some(), "{} owned by {} must pick remote", key, owner);
        } else {
            assert!(picked.is_none(), "{} owned by self must be served locally", key);
        }
    }
}

#[tokio::test]
async fn test_empty_peer_set_serves_locally() {
    let pool = HttpPool::new("http://127.0.0.1:8001");
    assert!(pool.pick_peer("Tom").is_none());
}

#[tokio::test]
async fn test_unreachable_peer_falls_back_to_loader() {
    let registry = Arc::new(Registry::new());
    let loader = Arc::new(CountingScores::new());
    let group = registry.new_group("scores", 2048, loader.clone());

    // Every key routes to a peer nothing listens on.
    let pool = Arc::new(HttpPool::new_with_options(
        "http://127.0.0.1:8001",
        HttpPoolOptions {
            fetch_timeout: Duration::from_millis(200),
            fetch_attempts: 1,
            ..HttpPoolOptions::default()
        },
    ));
    pool.set_peers(&["http://127.0.0.1:9"]);
    group.register_peer_picker(pool);

    let value = group.get("Tom").await.unwrap();
    assert_eq!(value.as_bytes(), b"630");
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);

    let stats = group.stats();
    assert_eq!(stats.peer_fetches, 1);
    assert_eq!(stats.peer_errors, 1);
}

#[tokio::test]
async fn test_two_node_federation_loads_each_key_once() {
    // Bind both nodes first so their addresses can seed both rings.
    let (registry_a, loader_a) = scores_registry();
    let (registry_b, loader_b) = scores_registry();
    let addr_a = spawn_node(registry_a.clone()).await;
    let addr_b = spawn_node(registry_b.clone()).await;

    let url_a = format!("http://{}", addr_a);
    let url_b = format!("http://{}", addr_b);
    let peers = [url_a.clone(), url_b.clone()];

    let pool_a = Arc::new(HttpPool::new(&url_a));
    pool_a.set_peers(&peers);
    registry_a
        .get_group("scores")
        .unwrap()
        .register_peer_picker(pool_a);

    let pool_b = Arc::new(HttpPool::new(&url_b));
    pool_b.set_peers(&peers);
    registry_b
        .get_group("scores")
        .unwrap()
        .register_peer_picker(pool_b);

    let keys = [("Tom", "630"), ("Jack", "589"), ("Sam", "567")];

    // Ask node A for everything, then node B; every answer is correct and
    // each key is loaded from the origin exactly once, on its owning node.
    for base in [&url_a, &url_b] {
        for (key, want) in keys {
            let url = format!("{}{}/scores/{}", base, DEFAULT_BASE_PATH, key);
            let response = reqwest::get(&url).await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
            assert_eq!(response.bytes().await.unwrap().as_ref(), want.as_bytes());
        }
    }

    let total_loads =
        loader_a.loads.load(Ordering::SeqCst) + loader_b.loads.load(Ordering::SeqCst);
    assert_eq!(total_loads, keys.len(), "each key loads once at its owner");
}
