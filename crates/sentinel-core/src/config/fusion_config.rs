//! Risk-fusion configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FALLBACK_CLEAN_PROBABILITY, DEFAULT_FALLBACK_CONFIDENCE,
    DEFAULT_FALLBACK_KEYWORD_PROBABILITY, DEFAULT_HIGH_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD,
    DEFAULT_SNIPPET_MAX_CHARS,
};

/// Thresholds and fallbacks for the tiered risk policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FusionConfig {
    /// `p_malicious` strictly above this is HIGH. Default: 0.85.
    pub high_threshold: Option<f64>,
    /// `p_malicious` strictly above this is at least MEDIUM. Default: 0.40.
    pub medium_threshold: Option<f64>,
    /// Fallback probability when the classifier fails and a keyword matched. Default: 0.5.
    pub fallback_keyword_probability: Option<f64>,
    /// Fallback probability when the classifier fails and nothing matched. Default: 0.1.
    pub fallback_clean_probability: Option<f64>,
    /// Confidence reported on fallback (0-100). Default: 50.0.
    pub fallback_confidence: Option<f64>,
    /// Maximum snippet length in line findings. Default: 120.
    pub snippet_max_chars: Option<usize>,
    /// Replaces the built-in pattern table when set.
    pub patterns_path: Option<PathBuf>,
}

impl FusionConfig {
    pub fn effective_high_threshold(&self) -> f64 {
        self.high_threshold.unwrap_or(DEFAULT_HIGH_THRESHOLD)
    }

    pub fn effective_medium_threshold(&self) -> f64 {
        self.medium_threshold.unwrap_or(DEFAULT_MEDIUM_THRESHOLD)
    }

    pub fn effective_fallback_keyword_probability(&self) -> f64 {
        self.fallback_keyword_probability
            .unwrap_or(DEFAULT_FALLBACK_KEYWORD_PROBABILITY)
    }

    pub fn effective_fallback_clean_probability(&self) -> f64 {
        self.fallback_clean_probability
            .unwrap_or(DEFAULT_FALLBACK_CLEAN_PROBABILITY)
    }

    pub fn effective_fallback_confidence(&self) -> f64 {
        self.fallback_confidence.unwrap_or(DEFAULT_FALLBACK_CONFIDENCE)
    }

    pub fn effective_snippet_max_chars(&self) -> usize {
        self.snippet_max_chars.unwrap_or(DEFAULT_SNIPPET_MAX_CHARS)
    }
}
