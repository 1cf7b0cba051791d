use crate::error::AppError;
use crate::infrastructure::document::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<PipelineServiceError> for AppError {
    fn from(err: PipelineServiceError) -> Self {
        match err {
            PipelineServiceError::Document(e) => AppError::Document(e.to_string()),
            PipelineServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
