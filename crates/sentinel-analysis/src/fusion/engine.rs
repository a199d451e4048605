//! Risk fusion: keyword priority over a thresholded classifier probability.
//!
//! Policy, first match wins:
//! 0. INVALID  : the source did not parse for its language.
//! 1. CRITICAL : an enabled pattern occurs in the sanitized code.
//! 2. HIGH     : `p_malicious > high_threshold`.
//! 3. MEDIUM   : `p_malicious > medium_threshold`.
//! 4. LOW      : everything else.

use sentinel_core::config::FusionConfig;
use sentinel_core::errors::{ClassifierError, PatternError};
use sentinel_core::tracing::metrics;

use super::patterns::{PatternHits, PatternTable};
use super::types::{LineFinding, RiskLevel, ScanVerdict, VerdictMetadata};
use crate::language::Language;

const REASON_INVALID: &str = "Syntax Error: This code cannot be executed as written";
const REASON_MEDIUM: &str =
    "Suspicious patterns noted, but insufficient evidence for threat classification";
const REASON_LOW: &str = "Code structure follows standard safety profiles";

/// Resolved fusion thresholds and fallbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionSettings {
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub fallback_keyword_probability: f64,
    pub fallback_clean_probability: f64,
    pub fallback_confidence: f64,
    pub snippet_max_chars: usize,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self::from(&FusionConfig::default())
    }
}

impl From<&FusionConfig> for FusionSettings {
    fn from(config: &FusionConfig) -> Self {
        Self {
            high_threshold: config.effective_high_threshold(),
            medium_threshold: config.effective_medium_threshold(),
            fallback_keyword_probability: config.effective_fallback_keyword_probability(),
            fallback_clean_probability: config.effective_fallback_clean_probability(),
            fallback_confidence: config.effective_fallback_confidence(),
            snippet_max_chars: config.effective_snippet_max_chars(),
        }
    }
}

/// Everything the engine needs to decide on a snippet that parsed.
#[derive(Debug, Clone)]
pub struct FusionInput<'a> {
    pub raw_code: &'a str,
    /// `raw_code` with comments and docstrings blanked.
    pub sanitized_code: &'a str,
    pub language: Language,
    pub language_confidence: f64,
    pub nodes_scanned: usize,
    /// Classifier output, or why there is none.
    pub prediction: Result<[f64; 2], ClassifierError>,
}

/// Pure tier decision. Keyword priority, then strict thresholds.
pub fn classify_tier(keyword_hit: bool, p_malicious: f64, settings: &FusionSettings) -> RiskLevel {
    if keyword_hit {
        RiskLevel::Critical
    } else if p_malicious > settings.high_threshold {
        RiskLevel::High
    } else if p_malicious > settings.medium_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// `round(max(p) * 100, 1)`.
pub fn confidence_from(probabilities: [f64; 2]) -> f64 {
    let top = probabilities[0].max(probabilities[1]);
    (top * 1000.0).round() / 10.0
}

pub struct RiskFusionEngine {
    patterns: PatternTable,
    settings: FusionSettings,
}

impl RiskFusionEngine {
    pub fn new(patterns: PatternTable, settings: FusionSettings) -> Self {
        Self { patterns, settings }
    }

    /// Engine with the configured pattern table (or the built-in one).
    pub fn from_config(config: &FusionConfig) -> Result<Self, PatternError> {
        let patterns = match &config.patterns_path {
            Some(path) => PatternTable::load_from_file(path)?,
            None => PatternTable::builtin()?,
        };
        Ok(Self::new(patterns, FusionSettings::from(config)))
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    pub fn settings(&self) -> &FusionSettings {
        &self.settings
    }

    /// Fuse keyword hits and the classifier probability into a verdict.
    pub fn decide(&self, input: FusionInput<'_>) -> ScanVerdict {
        let hits = self.patterns.matches(input.sanitized_code);
        let keyword_hit = !hits.is_empty();

        let (probabilities, classifier_fallback) = match input.prediction {
            Ok(p) => (p, false),
            Err(e) => {
                let p = if keyword_hit {
                    self.settings.fallback_keyword_probability
                } else {
                    self.settings.fallback_clean_probability
                };
                tracing::warn!(error = %e, fallback_p = p, "classifier unavailable; using keyword fallback");
                ([1.0 - p, p], true)
            }
        };
        let p_malicious = probabilities[1];
        let risk_level = classify_tier(keyword_hit, p_malicious, &self.settings);

        let reason = match risk_level {
            RiskLevel::Critical => {
                let detail = hits
                    .first()
                    .and_then(|&i| self.patterns.get(i))
                    .map(|p| p.description.as_str())
                    .unwrap_or("Suspicious pattern detected");
                format!("Immediate threat: {detail}")
            }
            RiskLevel::High => format!(
                "Critical structural anomaly detected: {}% confidence",
                (p_malicious * 100.0).round()
            ),
            RiskLevel::Medium => REASON_MEDIUM.to_string(),
            _ => REASON_LOW.to_string(),
        };

        let confidence = if classifier_fallback {
            self.settings.fallback_confidence
        } else {
            confidence_from(probabilities)
        };

        tracing::debug!(
            language = %input.language,
            { metrics::RISK_LEVEL } = %risk_level,
            { metrics::P_MALICIOUS } = p_malicious,
            classifier_fallback,
            "verdict"
        );

        ScanVerdict {
            malicious: matches!(risk_level, RiskLevel::Critical | RiskLevel::High),
            risk_level,
            confidence,
            reason,
            language: input.language,
            line_findings: self.scan_lines(input.sanitized_code, input.raw_code),
            metadata: VerdictMetadata {
                nodes_scanned: input.nodes_scanned,
                language_confidence: input.language_confidence,
                classifier_fallback,
                matched_keywords: self.names(&hits),
            },
        }
    }

    /// Verdict for a snippet that failed to parse. Never malicious.
    ///
    /// There is no tree to sanitize with, so findings come from the raw text
    /// and are informational only.
    pub fn invalid(&self, raw_code: &str, language: Language, language_confidence: f64) -> ScanVerdict {
        let hits = self.patterns.matches(raw_code);
        ScanVerdict {
            malicious: false,
            risk_level: RiskLevel::Invalid,
            confidence: 0.0,
            reason: REASON_INVALID.to_string(),
            language,
            line_findings: self.scan_lines(raw_code, raw_code),
            metadata: VerdictMetadata {
                nodes_scanned: 0,
                language_confidence,
                classifier_fallback: false,
                matched_keywords: self.names(&hits),
            },
        }
    }

    /// One finding per (line, pattern) pair. Lines are matched on the
    /// sanitized text; snippets show the raw line.
    pub fn scan_lines(&self, sanitized_code: &str, raw_code: &str) -> Vec<LineFinding> {
        let mut findings = Vec::new();
        let mut raw_lines = raw_code.lines();
        for (index, line) in sanitized_code.lines().enumerate() {
            let raw_line = raw_lines.next().unwrap_or(line);
            for i in self.patterns.matches(line) {
                let Some(pattern) = self.patterns.get(i) else {
                    continue;
                };
                findings.push(LineFinding {
                    line: index + 1,
                    pattern: pattern.pattern.clone(),
                    severity: pattern.severity,
                    description: pattern.description.clone(),
                    cwe: pattern.cwe.clone(),
                    snippet: snippet(raw_line, self.settings.snippet_max_chars),
                });
            }
        }
        findings
    }

    fn names(&self, hits: &PatternHits) -> Vec<String> {
        hits.iter()
            .filter_map(|&i| self.patterns.get(i))
            .map(|p| p.pattern.clone())
            .collect()
    }
}

/// Trimmed line, cut to `max_chars` characters with a `...` suffix.
fn snippet(line: &str, max_chars: usize) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RiskFusionEngine {
        RiskFusionEngine::new(PatternTable::builtin().unwrap(), FusionSettings::default())
    }

    fn input<'a>(code: &'a str, prediction: Result<[f64; 2], ClassifierError>) -> FusionInput<'a> {
        FusionInput {
            raw_code: code,
            sanitized_code: code,
            language: Language::Python,
            language_confidence: 1.0,
            nodes_scanned: 10,
            prediction,
        }
    }

    #[test]
    fn keyword_beats_low_probability() {
        let v = engine().decide(input("os.system('ls')\n", Ok([0.99, 0.01])));
        assert_eq!(v.risk_level, RiskLevel::Critical);
        assert!(v.malicious);
        assert_eq!(
            v.reason,
            "Immediate threat: Shell command execution through os.system."
        );
        assert_eq!(v.confidence, 99.0);
    }

    #[test]
    fn thresholds_are_strict() {
        let s = FusionSettings::default();
        assert_eq!(classify_tier(false, 0.85, &s), RiskLevel::Medium);
        assert_eq!(classify_tier(false, 0.850001, &s), RiskLevel::High);
        assert_eq!(classify_tier(false, 0.40, &s), RiskLevel::Low);
        assert_eq!(classify_tier(false, 0.41, &s), RiskLevel::Medium);
    }

    #[test]
    fn high_reason_reports_rounded_percent() {
        let v = engine().decide(input("x = 1\n", Ok([0.08, 0.92])));
        assert_eq!(v.risk_level, RiskLevel::High);
        assert_eq!(v.reason, "Critical structural anomaly detected: 92% confidence");
        assert_eq!(v.confidence, 92.0);
    }

    #[test]
    fn medium_is_not_malicious() {
        let v = engine().decide(input("x = 1\n", Ok([0.4, 0.6])));
        assert_eq!(v.risk_level, RiskLevel::Medium);
        assert!(!v.malicious);
    }

    #[test]
    fn fallback_without_keyword_is_low_with_fixed_confidence() {
        let v = engine().decide(input(
            "x = 1\n",
            Err(ClassifierError::ShapeMismatch {
                expected: 3,
                actual: 2,
            }),
        ));
        assert_eq!(v.risk_level, RiskLevel::Low);
        assert_eq!(v.confidence, 50.0);
        assert!(v.metadata.classifier_fallback);
    }

    #[test]
    fn fallback_with_keyword_is_critical() {
        let v = engine().decide(input("eval(x)\n", Err(ClassifierError::NotLoaded)));
        assert_eq!(v.risk_level, RiskLevel::Critical);
        assert_eq!(v.confidence, 50.0);
        assert_eq!(v.metadata.matched_keywords, ["eval("]);
    }

    #[test]
    fn line_scan_reports_every_pair() {
        let code = "a = 1\nos.system('rm -rf /')\nb = eval(c)\n";
        let findings = engine().scan_lines(code, code);
        let pairs: Vec<(usize, &str)> = findings
            .iter()
            .map(|f| (f.line, f.pattern.as_str()))
            .collect();
        assert_eq!(pairs, [(2, "os.system"), (2, "rm -rf"), (3, "eval(")]);
        assert_eq!(findings[0].cwe.as_deref(), Some("CWE-78"));
    }

    #[test]
    fn snippets_are_trimmed_and_truncated() {
        assert_eq!(snippet("   eval(x)   ", 120), "eval(x)");
        let long = "x".repeat(130);
        let cut = snippet(&long, 120);
        assert_eq!(cut.len(), 123);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn invalid_verdict_is_never_malicious() {
        let v = engine().invalid("def f(:\n    eval(x)\n", Language::Python, 0.4);
        assert_eq!(v.risk_level, RiskLevel::Invalid);
        assert!(!v.malicious);
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.line_findings.len(), 1);
    }
}
