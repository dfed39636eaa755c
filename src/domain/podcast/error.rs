use crate::domain::audio::AssemblyError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PodcastServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("session not found")]
    NotFound,
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

impl From<PodcastServiceError> for AppError {
    fn from(err: PodcastServiceError) -> Self {
        match err {
            PodcastServiceError::Dependency(msg) => AppError::ExternalService(msg),
            PodcastServiceError::Invalid(msg) => AppError::BadRequest(msg),
            PodcastServiceError::NotFound => AppError::NotFound("podcast session".to_string()),
            PodcastServiceError::Assembly(e) => AppError::Internal(e.to_string()),
        }
    }
}
