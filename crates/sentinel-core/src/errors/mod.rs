//! Error handling for Sentinel.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod admission_error;
pub mod artifact_error;
pub mod classifier_error;
pub mod config_error;
pub mod corpus_error;
pub mod error_code;
pub mod parse_error;
pub mod pattern_error;
pub mod pipeline_error;

pub use admission_error::AdmissionError;
pub use artifact_error::ArtifactError;
pub use classifier_error::ClassifierError;
pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use error_code::SentinelErrorCode;
pub use parse_error::ParseError;
pub use pattern_error::PatternError;
pub use pipeline_error::PipelineError;
