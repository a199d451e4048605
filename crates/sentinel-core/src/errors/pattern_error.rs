//! Pattern-table errors.

use super::error_code::{self, SentinelErrorCode};

/// Errors that can occur while loading the dangerous-pattern table.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern table parse error: {0}")]
    InvalidTable(String),

    #[error("Empty pattern at index {index}")]
    EmptyPattern { index: usize },

    #[error("Unknown severity '{severity}' for pattern '{pattern}'")]
    UnknownSeverity { pattern: String, severity: String },

    #[error("Matcher construction failed: {0}")]
    MatcherBuild(String),
}

impl SentinelErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
