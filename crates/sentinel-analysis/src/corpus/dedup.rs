//! SHA-256 duplicate registry, scoped to one corpus-build run.

use rustc_hash::FxHashSet;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `text`'s UTF-8 bytes.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Append-only set of digests already emitted. Never persisted.
#[derive(Debug, Default)]
pub struct DuplicateRegistry {
    digests: FxHashSet<String>,
}

impl DuplicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, digest: &str) -> bool {
        self.digests.contains(digest)
    }

    /// Insert `digest`. Returns `false` if it was already present.
    pub fn record(&mut self, digest: &str) -> bool {
        if self.seen(digest) {
            return false;
        }
        self.digests.insert(digest.to_string())
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}
