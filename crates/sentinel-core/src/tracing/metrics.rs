//! Structured span field names shared across Sentinel subsystems.
//!
//! Consistent names keep log queries stable between the parser, the
//! corpus builder, and the fusion engine.

/// Parser: parse time in microseconds.
pub const PARSE_TIME_US: &str = "parse_time_us";

/// Language detection: confidence in [0, 1].
pub const DETECTION_CONFIDENCE: &str = "detection_confidence";

/// Features: pre-alignment column count.
pub const NODES_SCANNED: &str = "nodes_scanned";

/// Corpus: samples skipped as duplicates.
pub const DEDUP_SKIPPED: &str = "dedup_skipped";

/// Classifier: model hot-reloads observed.
pub const MODEL_RELOADS: &str = "model_reloads";

/// Fusion: final risk tier.
pub const RISK_LEVEL: &str = "risk_level";

/// Fusion: classifier probability of the malicious class.
pub const P_MALICIOUS: &str = "p_malicious";
