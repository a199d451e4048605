//! Verdict types produced by the fusion engine.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Risk tier. `Critical > High > Medium > Low`; `Invalid` is off the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Invalid,
}

impl RiskLevel {
    /// Ordinal position on the risk scale; `None` for `Invalid`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            RiskLevel::Low => Some(0),
            RiskLevel::Medium => Some(1),
            RiskLevel::High => Some(2),
            RiskLevel::Critical => Some(3),
            RiskLevel::Invalid => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to a pattern-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Severity> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// One pattern hit on one source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFinding {
    /// 1-based.
    pub line: usize,
    pub pattern: String,
    pub severity: Severity,
    pub description: String,
    pub cwe: Option<String>,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictMetadata {
    /// Distinct features before schema alignment; 0 when parsing failed.
    pub nodes_scanned: usize,
    pub language_confidence: f64,
    /// The classifier failed and a pseudo-probability was used.
    pub classifier_fallback: bool,
    /// Matched patterns, in table order.
    pub matched_keywords: Vec<String>,
}

/// The final analysis outcome returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanVerdict {
    pub malicious: bool,
    pub risk_level: RiskLevel,
    /// In `[0, 100]`, one decimal place.
    pub confidence: f64,
    pub reason: String,
    pub language: Language,
    pub line_findings: Vec<LineFinding>,
    pub metadata: VerdictMetadata,
}
