//! Comment and docstring blanking.
//!
//! Keyword checks must not fire on prose, so comment nodes and docstring
//! statements are overwritten with spaces. Newlines survive, which keeps
//! every line number stable for the line scan.

use crate::language::Language;
use crate::parsers::AstNode;

/// Kinds a single-string expression statement may hold to count as a docstring.
const STRING_KINDS: &[&str] = &[
    "string",
    "string_literal",
    "concatenated_string",
    "interpreted_string_literal",
    "raw_string_literal",
    "encapsed_string",
];

/// Descendant kinds that evaluate code inside a string literal: Python and
/// Ruby `interpolation`, JS `template_substitution`, PHP variables and
/// expressions embedded in `encapsed_string`.
const INTERPOLATION_KINDS: &[&str] = &[
    "interpolation",
    "template_substitution",
    "variable_name",
    "dynamic_variable_name",
    "member_access_expression",
    "member_call_expression",
    "function_call_expression",
    "subscript_expression",
];

/// Blank every comment and docstring in `code`, as located in `tree`.
pub fn sanitize(code: &str, tree: &AstNode, language: Language) -> String {
    let mut ranges = Vec::new();
    collect_blank_ranges(tree, language, &mut ranges);
    if ranges.is_empty() {
        return code.to_string();
    }

    let mut bytes = code.as_bytes().to_vec();
    for (start, end) in ranges {
        let end = end.min(bytes.len());
        for b in bytes.iter_mut().take(end).skip(start) {
            if *b != b'\n' && *b != b'\r' {
                *b = b' ';
            }
        }
    }
    // Ranges follow node boundaries, so no multi-byte character is split.
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn collect_blank_ranges(tree: &AstNode, language: Language, out: &mut Vec<(usize, usize)>) {
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if node.is_comment() {
            push_span(node, out);
            continue;
        }
        let mut first_statement = true;
        for child in &node.children {
            if child.is_comment() {
                push_span(child, out);
                continue;
            }
            if is_string_statement(child) && (first_statement || language == Language::Python) {
                push_span(child, out);
            } else {
                stack.push(child);
            }
            if child.named {
                first_statement = false;
            }
        }
    }
}

/// An expression statement consisting of nothing but one plain string
/// literal. Interpolated strings run code and never count.
fn is_string_statement(node: &AstNode) -> bool {
    if node.kind != "expression_statement" {
        return false;
    }
    let mut named = node.children.iter().filter(|c| c.named && !c.is_comment());
    match (named.next(), named.next()) {
        (Some(only), None) => {
            STRING_KINDS.contains(&only.kind.as_str())
                && !only
                    .preorder()
                    .any(|n| INTERPOLATION_KINDS.contains(&n.kind.as_str()))
        }
        _ => false,
    }
}

fn push_span(node: &AstNode, out: &mut Vec<(usize, usize)>) {
    if let Some(span) = node.position {
        out.push((span.start_byte, span.end_byte));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ParserRegistry;

    fn run(code: &str, language: Language) -> String {
        let registry = ParserRegistry::new();
        let tree = registry.parse(code, language).unwrap();
        sanitize(code, &tree, language)
    }

    #[test]
    fn python_comments_and_docstrings_are_blanked() {
        let code = "\"\"\"os.system docs\"\"\"\ndef f():\n    \"\"\"eval( here\"\"\"\n    x = 1  # exec(\n    return x\n";
        let clean = run(code, Language::Python);
        assert!(!clean.contains("os.system"));
        assert!(!clean.contains("eval("));
        assert!(!clean.contains("exec("));
        assert!(clean.contains("x = 1"));
        assert_eq!(clean.len(), code.len());
        assert_eq!(clean.lines().count(), code.lines().count());
    }

    #[test]
    fn string_arguments_are_kept() {
        let code = "run(\"rm -rf /\")\n";
        assert_eq!(run(code, Language::Python), code);
    }

    #[test]
    fn interpolated_strings_are_kept() {
        let py = "f\"{os.system('ls')}\"\n";
        assert_eq!(run(py, Language::Python), py);

        let js = "`${eval(x)}`;\n";
        assert_eq!(run(js, Language::JavaScript), js);

        let plain = "\"just prose about eval(\";\n";
        assert!(!run(plain, Language::JavaScript).contains("eval("));
    }

    #[test]
    fn javascript_block_comment_keeps_newlines() {
        let code = "/* eval(\n   x */\nlet y = 2;\n";
        let clean = run(code, Language::JavaScript);
        assert!(!clean.contains("eval("));
        assert_eq!(clean.lines().nth(2), Some("let y = 2;"));
    }
}
