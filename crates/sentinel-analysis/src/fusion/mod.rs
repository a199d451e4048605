//! Risk fusion: sanitizer, pattern table, line scan, and the tier policy.

pub mod engine;
pub mod patterns;
pub mod sanitize;
pub mod types;

pub use engine::{classify_tier, confidence_from, FusionInput, FusionSettings, RiskFusionEngine};
pub use patterns::{DangerPattern, PatternTable};
pub use sanitize::sanitize;
pub use types::{LineFinding, RiskLevel, ScanVerdict, Severity, VerdictMetadata};
