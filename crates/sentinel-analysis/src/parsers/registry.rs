//! Grammar registry: one tree-sitter grammar per supported language.

use std::time::Instant;

use rustc_hash::FxHashMap;
use sentinel_core::errors::ParseError;
use sentinel_core::tracing::metrics;

use super::ast::AstNode;
use super::categories::CategoryTable;
use super::error_tolerant::count_errors;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::language::Language;

/// Holds every grammar that loaded successfully.
///
/// Built once and read-only afterwards. Each parse call creates its own
/// `tree_sitter::Parser`, so a shared registry is `Send + Sync`.
pub struct ParserRegistry {
    grammars: FxHashMap<Language, tree_sitter::Language>,
    categories: CategoryTable,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    /// Load every supported grammar. Grammars that fail to initialize are
    /// logged and left out; the rest stay usable.
    pub fn new() -> Self {
        Self::with_languages(&Language::ALL)
    }

    /// Load only the given grammars.
    pub fn with_languages(languages: &[Language]) -> Self {
        let mut grammars = FxHashMap::default();
        for &language in languages {
            match load_grammar(language) {
                Ok(grammar) => {
                    grammars.insert(language, grammar);
                }
                Err(e) => {
                    tracing::warn!(language = %language, error = %e, "grammar unavailable; language disabled");
                }
            }
        }
        tracing::debug!(loaded = grammars.len(), "parser registry initialized");
        Self {
            grammars,
            categories: CategoryTable::default(),
        }
    }

    /// Languages whose grammar loaded, in declaration order.
    pub fn available_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|l| self.grammars.contains_key(l))
            .collect()
    }

    pub fn is_available(&self, language: Language) -> bool {
        self.grammars.contains_key(&language)
    }

    pub fn grammar(&self, language: Language) -> Option<&tree_sitter::Language> {
        self.grammars.get(&language)
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Parse `code`; `None` when the grammar is missing or the tree has syntax errors.
    pub fn parse(&self, code: &str, language: Language) -> Option<AstNode> {
        match self.parse_detailed(code, language) {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::debug!(language = %language, error = %e, "parse rejected");
                None
            }
        }
    }

    /// Parse `code`, reporting why a parse was rejected.
    pub fn parse_detailed(&self, code: &str, language: Language) -> Result<AstNode, ParseError> {
        let grammar = self
            .grammars
            .get(&language)
            .ok_or_else(|| ParseError::GrammarUnavailable {
                language: language.tag().to_string(),
            })?;

        let start = Instant::now();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(grammar)
            .map_err(|e| ParseError::GrammarInit {
                language: language.tag().to_string(),
                message: e.to_string(),
            })?;

        let tree = parser.parse(code, None).ok_or_else(|| ParseError::NoTree {
            language: language.tag().to_string(),
        })?;

        let root = tree.root_node();
        let (error_count, first_error) = count_errors(root);
        if error_count > 0 || root.has_error() {
            return Err(ParseError::Syntax {
                language: language.tag().to_string(),
                error_count: error_count.max(1),
                line: first_error.map(|s| s.line()).unwrap_or(1),
            });
        }

        let ast = AstNode::from_tree(&tree, code);
        tracing::trace!(
            language = %language,
            { metrics::PARSE_TIME_US } = start.elapsed().as_micros() as u64,
            "parsed"
        );
        Ok(ast)
    }

    /// Raw per-kind node counts of `code`, unprefixed. `None` when unparseable.
    pub fn node_counts(&self, code: &str, language: Language) -> Option<FeatureVector> {
        self.parse(code, language)
            .map(|tree| FeatureExtractor::new(&self.categories).extract(&tree))
    }

    /// Cross-language feature vector of `code`. `None` when unparseable.
    pub fn normalized_features(&self, code: &str, language: Language) -> Option<FeatureVector> {
        self.parse(code, language)
            .map(|tree| FeatureExtractor::new(&self.categories).normalize(&tree, language))
    }
}

fn load_grammar(language: Language) -> Result<tree_sitter::Language, ParseError> {
    let grammar = language.ts_language();
    // set_language performs the ABI compatibility check.
    tree_sitter::Parser::new()
        .set_language(&grammar)
        .map_err(|e| ParseError::GrammarInit {
            language: language.tag().to_string(),
            message: e.to_string(),
        })?;
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_grammars_load() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.available_languages(), Language::ALL.to_vec());
    }

    #[test]
    fn subset_registry_reports_unavailable() {
        let registry = ParserRegistry::with_languages(&[Language::Python]);
        assert!(registry.parse("var x = 1;", Language::JavaScript).is_none());
        assert!(matches!(
            registry.parse_detailed("var x = 1;", Language::JavaScript),
            Err(ParseError::GrammarUnavailable { .. })
        ));
    }

    #[test]
    fn syntax_error_is_rejected_with_line() {
        let registry = ParserRegistry::new();
        let err = registry
            .parse_detailed("x = 1\ny = 2\ndef f(:\n", Language::Python)
            .unwrap_err();
        match err {
            ParseError::Syntax { error_count, line, .. } => {
                assert!(error_count >= 1);
                assert!((1..=4).contains(&line));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParserRegistry>();
    }
}
