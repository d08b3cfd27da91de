use std::path::PathBuf;

use dyslexia_ai_core::ModelError;
use thiserror::Error;

/// Errors returned by the cleaning, training and prediction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("model fit error: {0}")]
    ModelFit(String),
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::FeatureCountMismatch { .. } => Self::SchemaMismatch(err.to_string()),
            other => Self::ModelFit(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
