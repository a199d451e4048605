//! Errors loading persisted artifacts (feature schema, model files).

use std::path::PathBuf;

use super::error_code::{self, SentinelErrorCode};

/// Errors that can occur while loading an offline-produced artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed artifact {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Duplicate schema column: {column}")]
    DuplicateColumn { column: String },
}

impl SentinelErrorCode for ArtifactError {
    fn error_code(&self) -> &'static str {
        error_code::ARTIFACT_ERROR
    }
}
