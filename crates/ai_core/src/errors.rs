//! Error types for the AI core

use thiserror::Error;

/// Errors raised while building, validating or evaluating a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Model structure is inconsistent
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    /// Feature vector does not match the model's feature set
    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Model could not be serialized for fingerprinting
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for AI core operations
pub type Result<T> = std::result::Result<T, ModelError>;
