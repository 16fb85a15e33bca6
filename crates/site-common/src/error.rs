/// Error types shared across the site crates.
///
/// These errors represent failures in infrastructure components (the music service,
/// Redis) that are common to the server and its tooling. Application-specific errors
/// should be defined in each crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("music service error: {0}")]
    Spotify(#[from] crate::spotify::SpotifyError),

    #[error("music service credentials are not configured")]
    SpotifyNotConfigured,
}
