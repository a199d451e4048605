//! Dangerous-pattern table: TOML definitions compiled into one Aho-Corasick
//! automaton.

use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use sentinel_core::errors::PatternError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::types::Severity;

/// The table shipped with the engine.
const DEFAULT_PATTERNS: &str = include_str!("../../patterns/default_patterns.toml");

/// A pattern definition as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlPatternDef {
    pub pattern: String,
    pub description: String,
    pub severity: String,
    pub cwe: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlPatternFile {
    #[serde(default)]
    pub patterns: Vec<TomlPatternDef>,
}

/// A validated, enabled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DangerPattern {
    pub pattern: String,
    pub description: String,
    pub severity: Severity,
    pub cwe: Option<String>,
}

/// Indices into [`PatternTable::patterns`], ascending.
pub type PatternHits = SmallVec<[usize; 4]>;

/// Enabled patterns plus their compiled matcher.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<DangerPattern>,
    matcher: Option<AhoCorasick>,
}

impl PatternTable {
    /// The built-in table.
    pub fn builtin() -> Result<Self, PatternError> {
        Self::load_from_str(DEFAULT_PATTERNS)
    }

    /// Load patterns from a TOML string. Disabled entries are dropped.
    pub fn load_from_str(toml_str: &str) -> Result<Self, PatternError> {
        let file: TomlPatternFile = toml::from_str(toml_str)
            .map_err(|e| PatternError::InvalidTable(format!("TOML parse error: {e}")))?;

        let mut patterns = Vec::new();
        for (index, def) in file.patterns.into_iter().enumerate() {
            if def.enabled == Some(false) {
                continue;
            }
            patterns.push(Self::compile(index, def)?);
        }
        Self::from_patterns(patterns)
    }

    /// Load patterns from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self, PatternError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PatternError::InvalidTable(format!("failed to read {}: {e}", path.display()))
        })?;
        let table = Self::load_from_str(&content)?;
        tracing::info!(path = %path.display(), patterns = table.len(), "pattern table loaded");
        Ok(table)
    }

    pub fn from_patterns(patterns: Vec<DangerPattern>) -> Result<Self, PatternError> {
        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(patterns.iter().map(|p| p.pattern.as_str()))
                    .map_err(|e| PatternError::MatcherBuild(e.to_string()))?,
            )
        };
        Ok(Self { patterns, matcher })
    }

    fn compile(index: usize, def: TomlPatternDef) -> Result<DangerPattern, PatternError> {
        if def.pattern.is_empty() {
            return Err(PatternError::EmptyPattern { index });
        }
        let severity =
            Severity::parse(&def.severity).ok_or_else(|| PatternError::UnknownSeverity {
                pattern: def.pattern.clone(),
                severity: def.severity.clone(),
            })?;
        Ok(DangerPattern {
            pattern: def.pattern,
            description: def.description,
            severity,
            cwe: def.cwe,
        })
    }

    pub fn patterns(&self) -> &[DangerPattern] {
        &self.patterns
    }

    pub fn get(&self, index: usize) -> Option<&DangerPattern> {
        self.patterns.get(index)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every pattern occurring anywhere in `text`, in table order.
    ///
    /// Overlapping occurrences all count, so `subprocess.Popen` reports both
    /// `subprocess.Popen` and `subprocess`.
    pub fn matches(&self, text: &str) -> PatternHits {
        let Some(matcher) = &self.matcher else {
            return PatternHits::new();
        };
        let mut seen = vec![false; self.patterns.len()];
        for m in matcher.find_overlapping_iter(text) {
            seen[m.pattern().as_usize()] = true;
        }
        seen.iter()
            .enumerate()
            .filter_map(|(i, hit)| hit.then_some(i))
            .collect()
    }
}
