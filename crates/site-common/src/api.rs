use serde::{Deserialize, Serialize};

/// A single track as shown by the now-playing widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_image_url: Option<String>,
    pub song_url: Option<String>,
}

/// Body of `GET /api/now-playing`.
///
/// `title` is always serialized (as `null` when nothing is known); the other
/// track fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingResponse {
    pub is_playing: bool,
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_url: Option<String>,
}

impl NowPlayingResponse {
    /// The fallback state: nothing playing, nothing recent.
    pub fn not_playing() -> Self {
        Self {
            is_playing: false,
            title: None,
            artist: None,
            album: None,
            album_image_url: None,
            song_url: None,
        }
    }

    pub fn from_track(track: Track, is_playing: bool) -> Self {
        Self {
            is_playing,
            title: Some(track.title),
            artist: Some(track.artist),
            album: Some(track.album),
            album_image_url: track.album_image_url,
            song_url: track.song_url,
        }
    }
}

/// Generic error body used by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
