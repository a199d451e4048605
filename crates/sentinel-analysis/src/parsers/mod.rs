//! Tree-sitter parser subsystem: 10 grammars behind one parse interface.

pub mod ast;
pub mod categories;
pub mod error_tolerant;
pub mod registry;

pub use ast::{AstNode, Span};
pub use categories::{Category, CategoryIssue, CategoryTable};
pub use registry::ParserRegistry;
