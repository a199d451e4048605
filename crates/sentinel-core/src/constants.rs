//! Shared constants for the Sentinel engine.

/// Sentinel version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted input size, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 50_000;

/// `p_malicious` above this is HIGH.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.85;

/// `p_malicious` above this (and not above HIGH) is MEDIUM.
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.40;

/// Pseudo-probability used when the classifier fails and a keyword matched.
pub const DEFAULT_FALLBACK_KEYWORD_PROBABILITY: f64 = 0.5;

/// Pseudo-probability used when the classifier fails and nothing matched.
pub const DEFAULT_FALLBACK_CLEAN_PROBABILITY: f64 = 0.1;

/// Diagnostic confidence reported on classifier fallback (0-100).
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 50.0;

/// Line-finding snippets are cut to this many characters.
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 120;

/// Content-detection score at which confidence saturates to 1.0.
pub const DETECTION_SATURATION_SCORE: f64 = 50.0;

/// Prefix of canonical identifier tokens (`VAR_0`, `VAR_1`, ...).
pub const CANONICAL_IDENTIFIER_PREFIX: &str = "VAR_";

/// Schema artifact version this build understands.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "sentinel.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "SENTINEL_LOG";
