/// Now-playing lookup with a short-lived Redis cache in front of the music service.
///
/// Key schema:
/// - `site:v1:now_playing`: JSON NowPlayingResponse (TTL 30s)
use tracing::info;

use crate::api::NowPlayingResponse;
use crate::error::CommonError;
use crate::redis::RedisCache;
use crate::spotify::SpotifyClient;

const KEY_PREFIX: &str = "site:v1:";
const NOW_PLAYING_TTL_SECS: u64 = 30;

#[derive(Clone)]
pub struct NowPlayingService {
    client: Option<SpotifyClient>,
    redis: RedisCache,
}

impl NowPlayingService {
    pub fn new(client: Option<SpotifyClient>, redis: RedisCache) -> Self {
        Self { client, redis }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn current(&self) -> Result<NowPlayingResponse, CommonError> {
        let key = format!("{KEY_PREFIX}now_playing");
        if let Some(cached) = self.redis.get_json::<NowPlayingResponse>(&key).await {
            info!("now-playing cache hit");
            return Ok(cached);
        }

        let client = self.client.as_ref().ok_or(CommonError::SpotifyNotConfigured)?;
        let fresh = client.now_playing().await?;
        self.redis
            .set_json_with_ttl(&key, &fresh, NOW_PLAYING_TTL_SECS)
            .await;
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_service_reports_error() {
        let service = NowPlayingService::new(None, RedisCache::disabled());
        assert!(!service.is_configured());
        let err = service.current().await.unwrap_err();
        assert!(matches!(err, CommonError::SpotifyNotConfigured));
    }
}
