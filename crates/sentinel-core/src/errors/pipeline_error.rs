//! Pipeline errors.

use super::error_code::SentinelErrorCode;
use super::{
    AdmissionError, ArtifactError, ClassifierError, ConfigError, CorpusError, ParseError,
    PatternError,
};

/// Errors that can occur while assembling or running the pipeline.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Admission error: {0}")]
    Admission(#[from] AdmissionError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SentinelErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Admission(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Classifier(e) => e.error_code(),
            Self::Artifact(e) => e.error_code(),
            Self::Pattern(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
