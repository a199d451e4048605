//! Corpus-build errors.

use std::path::PathBuf;

use super::error_code::{self, SentinelErrorCode};

/// Errors that abort a corpus-build run. Per-sample problems (duplicates,
/// unparseable files) are counted and logged instead.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Data directory not found: {path}")]
    MissingDataDir { path: PathBuf },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed corpus row at {path}:{line}: {message}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Corpus serialization failed: {0}")]
    Serialization(String),
}

impl SentinelErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        error_code::CORPUS_ERROR
    }
}
