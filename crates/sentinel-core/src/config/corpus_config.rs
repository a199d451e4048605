//! Corpus-build configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for offline corpus construction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding `clean/` and `corrupted/` sample folders.
    pub data_dir: Option<PathBuf>,
    /// Where the JSON-lines corpus is written.
    pub output_path: Option<PathBuf>,
    /// Parse and canonicalize files in parallel. Default: true.
    pub parallel: Option<bool>,
}

impl CorpusConfig {
    /// Data directory, resolved against `root`. Default: `<root>/data`.
    pub fn effective_data_dir(&self, root: &Path) -> PathBuf {
        root.join(self.data_dir.as_deref().unwrap_or(Path::new("data")))
    }

    /// Output file, resolved against `root`. Default: `<root>/corpus.jsonl`.
    pub fn effective_output_path(&self, root: &Path) -> PathBuf {
        root.join(self.output_path.as_deref().unwrap_or(Path::new("corpus.jsonl")))
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
