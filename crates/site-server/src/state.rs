use std::sync::Arc;

use site_common::now_playing::NowPlayingService;
use site_content::SiteContent;

/// Shared by every handler. Content is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<SiteContent>,
    pub now_playing: NowPlayingService,
}

impl AppState {
    pub fn new(content: SiteContent, now_playing: NowPlayingService) -> Self {
        Self {
            content: Arc::new(content),
            now_playing,
        }
    }
}
