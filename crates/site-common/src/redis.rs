//! Short-lived response cache for the site.
//!
//! Redis is optional. Without a URL, or when the server is unreachable, every read
//! is a miss and every write is dropped with a warning, and handlers go upstream.

use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// A malformed URL disables the cache instead of failing startup.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| match redis::Client::open(u) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, url = u, "invalid redis url, response cache disabled");
                None
            }
        });
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// PINGs the server once; used for the startup log line.
    pub async fn is_available(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        redis::cmd("PING").query_async::<String>(&mut conn).await.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, key, "cache read failed");
                None
            }
        }
    }

    /// Stores `value` under `key` for `ttl_secs`. Returns whether the write landed.
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        match conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key, "cache write failed");
                false
            }
        }
    }

    /// Reads a JSON entry. Entries that no longer deserialize count as misses.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, key, "stale cache entry ignored"))
            .ok()
    }

    pub async fn set_json_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => self.set_with_ttl(key, &json, ttl_secs).await,
            Err(e) => {
                warn!(error = %e, key, "cache entry not serializable");
                false
            }
        }
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| debug!(error = %e, "redis unreachable"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NowPlayingResponse;

    #[tokio::test]
    async fn disabled_cache_misses_everything() {
        let cache = RedisCache::new(None);
        assert!(!cache.is_enabled());
        assert!(!cache.is_available().await);
        assert_eq!(cache.get("site:v1:anything").await, None);
        assert!(!cache.set_with_ttl("site:v1:anything", "1", 30).await);
    }

    #[tokio::test]
    async fn invalid_url_degrades_to_disabled() {
        let cache = RedisCache::new(Some("not a redis url"));
        assert!(!cache.is_enabled());
        assert_eq!(cache.get("key").await, None);
    }

    #[tokio::test]
    async fn json_helpers_miss_without_redis() {
        let cache = RedisCache::disabled();
        assert!(
            !cache
                .set_json_with_ttl("site:v1:now_playing", &NowPlayingResponse::not_playing(), 30)
                .await
        );
        assert_eq!(cache.get_json::<NowPlayingResponse>("site:v1:now_playing").await, None);
    }
}
