use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;

use distributed_cache::config::NodeConfig;
use distributed_cache::group::{FnLoader, Registry};
use distributed_cache::http::handlers::handle_fetch;
use distributed_cache::http::{peer_router, HttpPool, HttpPoolOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} --bind <addr:port> [--peer <url>]...", args[0]);
        eprintln!("Example: {} --bind 127.0.0.1:8001", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:8002 --peer http://127.0.0.1:8001 --peer http://127.0.0.1:8002",
            args[0]
        );
        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut peers: Vec<String> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" => {
                peers.push(args[i + 1].clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let self_url = format!("http://{}", bind_addr);

    tracing::info!("Starting cache node on {}", bind_addr);

    let config = NodeConfig::from_env();

    // 1. Group registry with a demo group backed by an in-process slow db:
    let registry = Arc::new(Registry::new_with_sweep_interval(Duration::from_secs(
        config.sweep_interval_secs,
    )));

    let db: HashMap<String, String> = [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let group = registry.new_group(
        "scores",
        config.max_cache_bytes,
        Arc::new(FnLoader::new(move |key: &str| {
            tracing::info!("[slow db] search key {}", key);
            db.get(key)
                .map(|value| value.clone().into_bytes())
                .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
        })),
    );

    // 2. Peer pool:
    let pool = Arc::new(HttpPool::new_with_options(
        &self_url,
        HttpPoolOptions {
            replicas: config.ring_replicas,
            fetch_timeout: Duration::from_millis(config.peer_timeout_ms),
            fetch_attempts: config.peer_retry_attempts,
            ..HttpPoolOptions::default()
        },
    ));
    if peers.is_empty() {
        peers.push(self_url.clone());
    }
    pool.set_peers(&peers);
    tracing::info!("Peer set: {:?}", peers);

    group.register_peer_picker(pool.clone());

    // 3. HTTP router: the peer surface plus a small client-facing API.
    let app = peer_router(registry.clone(), pool.base_path())
        .route("/api/:group/:key", get(handle_fetch))
        .layer(axum::extract::Extension(registry));

    tracing::info!("Listening on {}", self_url);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
