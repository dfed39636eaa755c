use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("text too large: {0}")]
    TooLarge(String),
    #[error("project not found")]
    NotFound,
    #[error("segment not found")]
    SegmentNotFound,
}

impl From<ProjectServiceError> for AppError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::Dependency(msg) => AppError::ExternalService(msg),
            ProjectServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ProjectServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            ProjectServiceError::NotFound => AppError::NotFound("project".to_string()),
            ProjectServiceError::SegmentNotFound => AppError::NotFound("segment".to_string()),
        }
    }
}
