//! Classifier inference errors. Never surfaced to callers of `analyze`:
//! the fusion engine turns every one of these into a fallback probability.

use super::error_code::{self, SentinelErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("No model loaded")]
    NotLoaded,

    #[error("Feature shape mismatch: model expects {expected} inputs, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite probability")]
    NonFinite,

    #[error("Malformed model: {0}")]
    Malformed(String),
}

impl SentinelErrorCode for ClassifierError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotLoaded => error_code::MODEL_NOT_LOADED,
            Self::ShapeMismatch { .. } => error_code::SCHEMA_MISMATCH,
            _ => error_code::CLASSIFIER_ERROR,
        }
    }
}
