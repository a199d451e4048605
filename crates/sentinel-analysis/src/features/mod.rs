//! Structural features: node-kind counts, cross-language aggregates, and
//! alignment to a classifier's fixed column schema.

pub mod extractor;
pub mod schema;
pub mod vector;

pub use extractor::FeatureExtractor;
pub use schema::{align, AlignedVector, FeatureSchema};
pub use vector::FeatureVector;
