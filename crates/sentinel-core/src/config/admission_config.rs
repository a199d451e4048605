//! Admission-control configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_INPUT_CHARS;

/// Limits applied to a request before any analysis runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Maximum input length in characters. Default: 50,000.
    pub max_input_chars: Option<usize>,
}

impl AdmissionConfig {
    /// Returns the effective input limit, defaulting to 50,000 characters.
    pub fn effective_max_input_chars(&self) -> usize {
        self.max_input_chars.unwrap_or(DEFAULT_MAX_INPUT_CHARS)
    }
}
