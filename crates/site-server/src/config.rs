use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Server settings. The music service has its own settings in
/// `site_common::spotify::SpotifyConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    pub content_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub redis_url: Option<String>,
}

impl Config {
    /// Optional:
    /// - `SITE_CONTENT_DIR` (default: "content"; must exist)
    /// - `SITE_LISTEN_ADDR` (default: "127.0.0.1:3000")
    /// - `REDIS_URL`
    pub fn from_env() -> Result<Self, AppError> {
        let content_dir =
            PathBuf::from(std::env::var("SITE_CONTENT_DIR").unwrap_or_else(|_| "content".to_string()));
        if !content_dir.is_dir() {
            return Err(AppError::Config(format!(
                "content directory not found: {}",
                content_dir.display()
            )));
        }

        let raw_addr = std::env::var("SITE_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let listen_addr = raw_addr
            .parse()
            .map_err(|e| AppError::Config(format!("invalid SITE_LISTEN_ADDR {raw_addr:?}: {e}")))?;

        Ok(Self {
            content_dir,
            listen_addr,
            redis_url: std::env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty()),
        })
    }
}
