//! Tree walk producing per-kind counts and category aggregates.

use crate::language::Language;
use crate::parsers::{AstNode, Category, CategoryTable};

use super::vector::FeatureVector;

/// Counts node kinds over an [`AstNode`] tree.
pub struct FeatureExtractor<'a> {
    categories: &'a CategoryTable,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }

    /// Count every node at every depth, anonymous tokens included, keyed by kind.
    pub fn extract(&self, tree: &AstNode) -> FeatureVector {
        let mut counts = FeatureVector::new();
        for node in tree.preorder() {
            counts.increment(&node.kind);
        }
        counts
    }

    /// Cross-language features for a tree parsed as `language`:
    /// `<language>_<kind>` raw counts, all ten `common_<category>` aggregates
    /// (zero included), and `is_<language> = 1`.
    pub fn normalize(&self, tree: &AstNode, language: Language) -> FeatureVector {
        let raw = self.extract(tree);
        let tag = language.tag();

        let mut features: FeatureVector = raw
            .iter()
            .map(|(kind, count)| (format!("{tag}_{kind}"), count))
            .collect();

        for category in Category::ALL {
            let tags = self.categories.tags(category, language);
            let total: u64 = tags.iter().map(|t| raw.get(t)).sum();
            features.set(category.feature_name(), total);
        }

        features.set(format!("is_{tag}"), 1);
        features
    }
}
