use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use site_common::api::ErrorResponse;
use site_common::error::CommonError;
use site_content::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("post not found")]
    PostNotFound,

    #[error("project not found")]
    ProjectNotFound,

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::PostNotFound => (StatusCode::NOT_FOUND, "Post not found"),
            Self::ProjectNotFound => (StatusCode::NOT_FOUND, "Project not found"),
            Self::Common(e) => {
                tracing::error!(error = %e, "now-playing lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch Spotify data")
            }
            Self::Content(_) | Self::Task(_) | Self::Config(_) => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load content")
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
