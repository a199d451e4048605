//! Parser errors.

use super::error_code::{self, SentinelErrorCode};

/// Errors that can occur while parsing a snippet.
///
/// The analysis path never propagates these; they back `parse_detailed`
/// diagnostics and grammar-registry startup logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar unavailable for language: {language}")]
    GrammarUnavailable { language: String },

    #[error("Failed to load grammar for {language}: {message}")]
    GrammarInit { language: String, message: String },

    #[error("Tree-sitter produced no tree for {language}")]
    NoTree { language: String },

    #[error("Syntax errors in {language} source: {error_count} error node(s), first at line {line}")]
    Syntax {
        language: String,
        error_count: u32,
        line: u32,
    },
}

impl SentinelErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GrammarUnavailable { .. } | Self::GrammarInit { .. } => {
                error_code::GRAMMAR_UNAVAILABLE
            }
            _ => error_code::PARSE_ERROR,
        }
    }
}
