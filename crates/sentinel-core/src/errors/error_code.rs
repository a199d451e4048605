//! SentinelErrorCode trait for boundary conversion.

/// Every error enum exposes a stable, machine-readable code so that outer
/// surfaces (HTTP layer, history store) never match on display strings.
pub trait SentinelErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn boundary_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const GRAMMAR_UNAVAILABLE: &str = "GRAMMAR_UNAVAILABLE";
pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
pub const INPUT_TOO_LARGE: &str = "INPUT_TOO_LARGE";
pub const CLASSIFIER_ERROR: &str = "CLASSIFIER_ERROR";
pub const SCHEMA_MISMATCH: &str = "SCHEMA_MISMATCH";
pub const MODEL_NOT_LOADED: &str = "MODEL_NOT_LOADED";
pub const ARTIFACT_ERROR: &str = "ARTIFACT_ERROR";
pub const PATTERN_ERROR: &str = "PATTERN_ERROR";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
