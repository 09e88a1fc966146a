//! HTTP client for one remote peer.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::group::PeerClient;

/// Fetches group values from a single peer over HTTP.
///
/// Transient transport failures are retried with exponential backoff and
/// jitter before the error is reported to the coordinator, which then falls
/// back to its own origin loader.
pub struct HttpPeer {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    attempts: usize,
}

impl HttpPeer {
    /// `base_url` is the peer's address plus the wire base path, without a
    /// trailing slash, e.g. `http://10.0.0.2:8001/groupCache`.
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        timeout: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            client,
            base_url,
            timeout,
            attempts: attempts.max(1),
        }
    }

    fn fetch_url(&self, group: &str, key: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| CacheError::PeerFetch(format!("invalid peer url {}: {}", self.base_url, e)))?;
        // Pushing segments percent-encodes the group and key.
        url.path_segments_mut()
            .map_err(|_| CacheError::PeerFetch(format!("peer url {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(group)
            .push(key);
        Ok(url)
    }

    async fn get_with_retry(&self, url: reqwest::Url) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..self.attempts {
            let response = self
                .client
                .get(url.clone())
                .timeout(self.timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == self.attempts {
                        return Err(CacheError::PeerFetch(e.to_string()));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(CacheError::PeerFetch("retry attempts exhausted".to_string()))
    }
}

#[async_trait]
impl PeerClient for HttpPeer {
    async fn fetch(&self, group: &str, key: &str) -> Result<Bytes> {
        let url = self.fetch_url(group, key)?;
        debug!("fetching {}/{} from peer {}", group, key, self.base_url);

        let response = self.get_with_retry(url).await?;
        if !response.status().is_success() {
            return Err(CacheError::PeerFetch(format!(
                "peer returned {}",
                response.status()
            )));
        }

        // Read the whole body; values are not capped at a fixed buffer.
        response
            .bytes()
            .await
            .map_err(|e| CacheError::PeerFetch(e.to_string()))
    }
}
