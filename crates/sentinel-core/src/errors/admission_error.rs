//! Admission-control errors, raised before any parsing happens.

use super::error_code::{self, SentinelErrorCode};

/// Input rejected at the door. Distinct from analysis outcomes: an
/// unparseable snippet is an INVALID verdict, not one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("No code provided")]
    EmptyInput,

    #[error("Code exceeds maximum character limit ({length} > {max})")]
    TooLarge { length: usize, max: usize },
}

impl SentinelErrorCode for AdmissionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => error_code::EMPTY_INPUT,
            Self::TooLarge { .. } => error_code::INPUT_TOO_LARGE,
        }
    }
}
