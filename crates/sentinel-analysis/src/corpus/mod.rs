//! Corpus construction: function-level units, canonicalized and deduplicated.

pub mod builder;
pub mod dedup;
pub mod types;

pub use builder::{build_corpus, CorpusBuilder};
pub use dedup::{content_hash, DuplicateRegistry};
pub use types::{CorpusLabel, CorpusRow, CorpusStats};
