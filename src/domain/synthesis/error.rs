use crate::domain::audio::AssemblyError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    #[error("project not found")]
    NotFound,
    #[error("segment not found")]
    SegmentNotFound,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

impl From<SynthesisServiceError> for ProductionError {
    fn from(err: SynthesisServiceError) -> Self {
        match err {
            SynthesisServiceError::Dependency(msg) => ProductionError::Dependency(msg),
            SynthesisServiceError::Invalid(msg) => ProductionError::Invalid(msg),
        }
    }
}

impl From<ProductionError> for AppError {
    fn from(err: ProductionError) -> Self {
        match err {
            ProductionError::NotFound => AppError::NotFound("project".to_string()),
            ProductionError::SegmentNotFound => AppError::NotFound("segment".to_string()),
            ProductionError::Invalid(msg) => AppError::BadRequest(msg),
            ProductionError::Dependency(msg) => AppError::ExternalService(msg),
            ProductionError::Assembly(e) => AppError::Internal(e.to_string()),
        }
    }
}
