use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::{NowPlayingResponse, Track};

#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    pub accounts_url: String,
    pub api_url: String,
    pub timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl SpotifyConfig {
    pub fn from_env() -> Self {
        let accounts_url = std::env::var("SPOTIFY_ACCOUNTS_URL")
            .unwrap_or_else(|_| "https://accounts.spotify.com".to_string());

        let api_url =
            std::env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com".to_string());

        let timeout = std::env::var("SPOTIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Self {
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            max_error_body_bytes: 4 * 1024,
        }
    }
}

/// Refresh-token credentials for the account whose playback is shown.
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl SpotifyCredentials {
    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REFRESH_TOKEN`.
    /// Returns `None` unless all three are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            client_id: var("SPOTIFY_CLIENT_ID")?,
            client_secret: var("SPOTIFY_CLIENT_SECRET")?,
            refresh_token: var("SPOTIFY_REFRESH_TOKEN")?,
        })
    }
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("token refresh rejected: status={status} body={body}")]
    Token { status: StatusCode, body: String },
}

/// Playback state reported by the currently-playing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    pub track: Option<Track>,
}

impl CurrentlyPlaying {
    fn idle() -> Self {
        Self {
            is_playing: false,
            track: None,
        }
    }
}

#[derive(Clone)]
pub struct SpotifyClient {
    config: SpotifyConfig,
    credentials: SpotifyCredentials,
    http: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig, credentials: SpotifyCredentials) -> Result<Self, SpotifyError> {
        let http = reqwest::Client::builder()
            .user_agent("portfolio-site/now-playing")
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            credentials,
            http,
        })
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Exchanges the refresh token for a short-lived access token.
    pub async fn access_token(&self) -> Result<String, SpotifyError> {
        let url = format!("{}/api/token", self.config.accounts_url);
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(SpotifyError::Token { status, body });
        }

        let bytes = resp.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&bytes)?;
        Ok(token.access_token)
    }

    /// 204, any non-success status, or a payload without an item all mean
    /// "nothing playing".
    pub async fn currently_playing(&self, access_token: &str) -> Result<CurrentlyPlaying, SpotifyError> {
        let url = format!("{}/v1/me/player/currently-playing", self.config.api_url);
        let resp = self.http.get(&url).bearer_auth(access_token).send().await?;

        let status = resp.status();
        if status == StatusCode::NO_CONTENT || !status.is_success() {
            debug!(status = status.as_u16(), "currently-playing returned no playback");
            return Ok(CurrentlyPlaying::idle());
        }

        let bytes = resp.bytes().await?;
        let payload: CurrentlyPlayingPayload = serde_json::from_slice(&bytes)?;
        let Some(item) = payload.item else {
            return Ok(CurrentlyPlaying::idle());
        };

        Ok(CurrentlyPlaying {
            is_playing: payload.is_playing,
            track: Some(item.into_track()),
        })
    }

    /// The most recently played track, or `None` when the history is empty or
    /// the endpoint refuses.
    pub async fn recently_played(&self, access_token: &str) -> Result<Option<Track>, SpotifyError> {
        let url = format!("{}/v1/me/player/recently-played", self.config.api_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("limit", "1")])
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "recently-played returned no history");
            return Ok(None);
        }

        let bytes = resp.bytes().await?;
        let payload: RecentlyPlayedPayload = serde_json::from_slice(&bytes)?;
        Ok(payload.items.into_iter().next().map(|h| h.track.into_track()))
    }

    /// Current playback when something is playing, otherwise the last played
    /// track, otherwise the empty state.
    pub async fn now_playing(&self) -> Result<NowPlayingResponse, SpotifyError> {
        let token = self.access_token().await?;

        let current = self.currently_playing(&token).await?;
        if current.is_playing {
            if let Some(track) = current.track {
                return Ok(NowPlayingResponse::from_track(track, true));
            }
        }

        match self.recently_played(&token).await? {
            Some(track) => Ok(NowPlayingResponse::from_track(track, false)),
            None => Ok(NowPlayingResponse::not_playing()),
        }
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlayingPayload {
    #[serde(default)]
    is_playing: bool,
    item: Option<TrackPayload>,
}

#[derive(Debug, Deserialize)]
struct RecentlyPlayedPayload {
    #[serde(default)]
    items: Vec<PlayHistoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PlayHistoryPayload {
    track: TrackPayload,
}

#[derive(Debug, Deserialize)]
struct TrackPayload {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistPayload>,
    album: AlbumPayload,
    #[serde(default)]
    external_urls: ExternalUrlsPayload,
}

#[derive(Debug, Deserialize)]
struct ArtistPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumPayload {
    name: String,
    #[serde(default)]
    images: Vec<ImagePayload>,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrlsPayload {
    spotify: Option<String>,
}

impl TrackPayload {
    fn into_track(self) -> Track {
        let artist = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Track {
            title: self.name,
            artist,
            album: self.album.name,
            album_image_url: self.album.images.into_iter().next().map(|i| i.url),
            song_url: self.external_urls.spotify,
        }
    }
}
