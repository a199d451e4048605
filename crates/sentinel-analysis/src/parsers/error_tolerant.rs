//! Syntax-error accounting over raw tree-sitter trees.

use tree_sitter::Node;

use super::ast::Span;

/// Count ERROR and MISSING nodes, returning the first one in document order.
pub fn count_errors(root: Node) -> (u32, Option<Span>) {
    let mut count = 0u32;
    let mut first = None;
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            count += 1;
            if first.is_none() {
                first = Some(Span::from_ts_node(&node));
            }
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return (count, first);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn parse(code: &str, lang: Language) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&lang.ts_language()).unwrap();
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn clean_source_has_no_errors() {
        let tree = parse("def f(x):\n    return x\n", Language::Python);
        assert_eq!(count_errors(tree.root_node()), (0, None));
    }

    #[test]
    fn broken_source_reports_first_error() {
        let tree = parse("x = 1\ndef f(:\n", Language::Python);
        let (count, first) = count_errors(tree.root_node());
        assert!(count > 0);
        assert!(first.is_some());
    }
}
