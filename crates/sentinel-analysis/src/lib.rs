//! sentinel-analysis: structural fingerprinting and risk fusion for source
//! snippets across ten languages.
//!
//! Raw code flows through language detection, tree-sitter parsing, feature
//! extraction, schema alignment, and classifier inference, then into the
//! fusion engine, which combines keyword hits with the classifier's
//! probability into a tiered [`fusion::ScanVerdict`]. The corpus builder
//! reuses the same parsing and canonicalization to produce deduplicated
//! training rows.

pub mod canonical;
pub mod classifier;
pub mod corpus;
pub mod features;
pub mod fusion;
pub mod language;
pub mod parsers;
pub mod pipeline;

pub use fusion::{RiskLevel, ScanVerdict};
pub use language::Language;
pub use pipeline::{analyze, AnalysisContext, AnalysisRequest};
