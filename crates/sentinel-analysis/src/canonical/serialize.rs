//! Deterministic S-expression rendering of a tree, comments dropped.

use crate::parsers::AstNode;

enum Step<'a> {
    Enter(&'a AstNode),
    Exit,
}

/// Render `tree` as an S-expression: named leaves as `(kind text)`, inner
/// nodes as `(kind child ...)`, anonymous tokens as quoted strings.
pub fn to_canonical_text(tree: &AstNode) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Enter(tree)];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Exit => {
                out.push(')');
                continue;
            }
            Step::Enter(node) => node,
        };
        if node.is_comment() {
            continue;
        }
        if !out.is_empty() && !out.ends_with('(') {
            out.push(' ');
        }

        if !node.named && node.is_leaf() {
            let token = node.text.as_deref().unwrap_or(&node.kind);
            out.push_str(&format!("{token:?}"));
            continue;
        }

        out.push('(');
        out.push_str(&node.kind);
        if node.is_leaf() {
            if let Some(text) = &node.text {
                out.push(' ');
                out.push_str(text);
            }
            out.push(')');
            continue;
        }
        stack.push(Step::Exit);
        stack.extend(node.children.iter().rev().map(Step::Enter));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parsers::ParserRegistry;

    #[test]
    fn renders_named_and_anonymous_nodes() {
        let registry = ParserRegistry::new();
        let tree = registry.parse("f(1)\n", Language::Python).unwrap();
        assert_eq!(
            to_canonical_text(&tree),
            r#"(module (expression_statement (call (identifier f) (argument_list "(" (integer 1) ")"))))"#
        );
    }

    #[test]
    fn comments_and_layout_do_not_change_the_text() {
        let registry = ParserRegistry::new();
        let a = registry.parse("x = 1  # set x\n", Language::Python).unwrap();
        let b = registry.parse("# header\nx   =   1\n", Language::Python).unwrap();
        assert_eq!(to_canonical_text(&a), to_canonical_text(&b));
    }
}
