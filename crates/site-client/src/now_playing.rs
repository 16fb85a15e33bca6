use std::future::Future;
use std::time::Duration;

use site_common::api::NowPlayingResponse;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The widget refreshes on this fixed interval; there is no backoff.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PollError {
    #[error("now-playing request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("now-playing endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Anything that can report what is playing.
pub trait NowPlayingSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<NowPlayingResponse, PollError>> + Send;
}

/// Fetches the site's own `/api/now-playing` endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}/api/now-playing", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NowPlayingSource for HttpSource {
    async fn fetch(&self) -> Result<NowPlayingResponse, PollError> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        Ok(resp.json().await?)
    }
}

/// Keeps the latest now-playing state in a watch channel.
pub struct NowPlayingPoller<S> {
    source: S,
    interval: Duration,
    state: watch::Sender<NowPlayingResponse>,
}

impl<S: NowPlayingSource + 'static> NowPlayingPoller<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(NowPlayingResponse::not_playing());
        Self {
            source,
            interval: POLL_INTERVAL,
            state,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<NowPlayingResponse> {
        self.state.subscribe()
    }

    /// Fetches once and publishes the result. Any failure publishes "not playing".
    pub async fn refresh(&self) -> NowPlayingResponse {
        let next = match self.source.fetch().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "now-playing poll failed");
                NowPlayingResponse::not_playing()
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Polls immediately, then every interval, until every receiver is dropped.
    pub fn spawn(self) -> (watch::Receiver<NowPlayingResponse>, JoinHandle<()>) {
        let rx = self.subscribe();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                if self.state.is_closed() {
                    debug!("now-playing poller stopped");
                    break;
                }
                self.refresh().await;
            }
        });
        (rx, handle)
    }
}
