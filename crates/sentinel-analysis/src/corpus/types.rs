//! Corpus row and build statistics.

use serde::{Deserialize, Serialize};

/// Training label. Serialized as the integer `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CorpusLabel {
    Clean,
    Malicious,
}

impl From<CorpusLabel> for u8 {
    fn from(label: CorpusLabel) -> u8 {
        match label {
            CorpusLabel::Clean => 0,
            CorpusLabel::Malicious => 1,
        }
    }
}

impl TryFrom<u8> for CorpusLabel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CorpusLabel::Clean),
            1 => Ok(CorpusLabel::Malicious),
            other => Err(format!("label must be 0 or 1, got {other}")),
        }
    }
}

/// One training sample, written as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusRow {
    pub raw_code: String,
    pub normalized_code: String,
    pub label: CorpusLabel,
    pub source: String,
}

/// Counters for one build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    /// Sources offered to the builder.
    pub sources: usize,
    /// Units extracted from parseable sources.
    pub units: usize,
    pub kept: usize,
    pub duplicates: usize,
    pub unparseable: usize,
}
