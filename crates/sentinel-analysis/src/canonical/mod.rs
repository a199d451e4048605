//! Identifier canonicalization and the canonical text form used for hashing.

pub mod canonicalizer;
pub mod serialize;

pub use canonicalizer::{CanonicalIdentifierMap, Canonicalized, Canonicalizer};
pub use serialize::to_canonical_text;
