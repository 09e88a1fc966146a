use std::time::Duration;

use crate::cache::{ByteView, SharedCache};

#[tokio::test]
async fn test_shared_cache_miss_before_first_add() {
    let cache = SharedCache::new(1024);
    assert_eq!(cache.get("anything"), None);
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.used_bytes(), 0);
}

#[tokio::test]
async fn test_shared_cache_add_and_get() {
    let cache = SharedCache::new(1024);

    cache.add("key", ByteView::from("value"), None);
    assert_eq!(cache.get("key"), Some(ByteView::from("value")));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.used_bytes(), ("key".len() + "value".len()) as u64);
}

#[tokio::test]
async fn test_sweeper_removes_expired_entries() {
    let cache = SharedCache::new_with_sweep_interval(1024, Duration::from_millis(20));

    cache.add("fleeting", ByteView::from("v"), Some(Duration::from_millis(20)));
    cache.add("lasting", ByteView::from("v"), None);

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.get("fleeting"), None);
    assert_eq!(cache.get("lasting"), Some(ByteView::from("v")));
}

#[tokio::test]
async fn test_sweeper_preserves_unexpired_entries() {
    let cache = SharedCache::new_with_sweep_interval(1024, Duration::from_millis(20));

    cache.add("slow", ByteView::from("v"), Some(Duration::from_secs(3600)));

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(cache.get("slow"), Some(ByteView::from("v")));
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let cache = SharedCache::new(1024);
    cache.stop();
    cache.stop();

    // The cache keeps serving after the sweeper is gone.
    cache.add("key", ByteView::from("value"), None);
    assert!(cache.get("key").is_some());
}

#[tokio::test]
async fn test_byteview_copies_are_defensive() {
    let cache = SharedCache::new(1024);
    cache.add("key", ByteView::from("original"), None);

    let view = cache.get("key").unwrap();
    let mut copy = view.to_vec();
    copy[0] = b'X';

    assert_eq!(
        cache.get("key").unwrap().as_bytes(),
        b"original",
        "mutating an extracted copy must not touch the cached value"
    );
}
