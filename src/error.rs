//! Error taxonomy for the recognition pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the recognition pipeline.
///
/// Every failure is fail-fast and carries enough context to diagnose
/// without re-running; nothing is retried or swallowed internally.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The requested model type has no registry entry.
    #[error("unsupported model type: {0:?}")]
    UnsupportedModelType(String),

    /// The model file for a valid model type is not on disk.
    #[error("model artifact missing: {}", .0.display())]
    ModelArtifactMissing(PathBuf),

    /// Image decode, resize, or tensor layout failed.
    #[error("preprocessing failed: {0}")]
    PreprocessingFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The output tensor's class dimension does not match the alphabet.
    #[error("output has {got} classes, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model load or execution failed inside the engine.
    #[error("inference engine failed: {0}")]
    InferenceEngineFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Convenient result alias for recognition operations.
pub type OcrResult<T> = Result<T, OcrError>;
