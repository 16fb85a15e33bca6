mod config;
mod error;
mod routes;
mod state;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use site_common::now_playing::NowPlayingService;
use site_common::redis::RedisCache;
use site_common::spotify::{SpotifyClient, SpotifyConfig, SpotifyCredentials};
use site_content::SiteContent;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting site server");

    // 1. Load configuration
    let config = Config::from_env()?;
    info!(
        content_dir = %config.content_dir.display(),
        listen_addr = %config.listen_addr,
        "configuration loaded"
    );

    // 2. Connect to Redis (optional)
    let redis = RedisCache::new(config.redis_url.as_deref());
    if redis.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }

    // 3. Music service client (optional)
    let spotify = match SpotifyCredentials::from_env() {
        Some(credentials) => {
            let spotify_config = SpotifyConfig::from_env();
            info!(
                accounts_url = %spotify_config.accounts_url,
                api_url = %spotify_config.api_url,
                timeout_ms = spotify_config.timeout.as_millis(),
                "spotify client configured"
            );
            Some(SpotifyClient::new(spotify_config, credentials)?)
        }
        None => {
            warn!("spotify credentials not set, /api/now-playing will report errors");
            None
        }
    };

    // 4. Load content
    let content = SiteContent::load(&config.content_dir)?;

    // 5. Serve
    let state = AppState::new(content, NowPlayingService::new(spotify, redis));
    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
