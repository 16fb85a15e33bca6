pub mod api;
pub mod error;
pub mod now_playing;
pub mod redis;
pub mod spotify;
