//! Alpha-renaming of identifiers to `VAR_n` tokens.
//!
//! Two snippets that differ only in the names they bind canonicalize to the
//! same tree. Member names (`os.system`, `obj.field`) are left alone so that
//! distinct APIs stay distinct.

use rustc_hash::FxHashMap;
use sentinel_core::constants::CANONICAL_IDENTIFIER_PREFIX;

use crate::parsers::AstNode;

/// Leaf kinds treated as renameable identifiers. PHP spells them `name`.
const IDENTIFIER_KINDS: &[&str] = &["identifier", "name"];

/// Parent field roles that mark a member access.
const MEMBER_FIELDS: &[&str] = &["attribute", "property", "field", "method"];

/// Leaf kinds that are always member names.
const MEMBER_KINDS: &[&str] = &["property_identifier", "field_identifier"];

/// Parents whose `name` child is the accessed member (C#, PHP, Java).
const NAME_MEMBER_PARENTS: &[&str] = &[
    "member_access_expression",
    "member_call_expression",
    "nullsafe_member_call_expression",
    "scoped_call_expression",
    "field_access",
];

/// Original identifier → canonical token, for exactly one normalization unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalIdentifierMap {
    tokens: FxHashMap<String, String>,
    next: usize,
}

impl CanonicalIdentifierMap {
    fn token_for(&mut self, name: &str) -> String {
        if let Some(token) = self.tokens.get(name) {
            return token.clone();
        }
        let token = format!("{CANONICAL_IDENTIFIER_PREFIX}{}", self.next);
        self.next += 1;
        self.tokens.insert(name.to_string(), token.clone());
        token
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Output of a canonicalization pass.
#[derive(Debug, Clone)]
pub struct Canonicalized {
    pub tree: AstNode,
    pub map: CanonicalIdentifierMap,
}

/// Single-use renamer. `canonicalize` consumes it, so a mapping can never
/// leak from one unit into the next.
#[derive(Debug, Default)]
pub struct Canonicalizer {
    map: CanonicalIdentifierMap,
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename identifier leaves in pre-order. First occurrence takes the next
    /// token; later occurrences reuse it.
    pub fn canonicalize(mut self, mut tree: AstNode) -> Canonicalized {
        let mut stack: Vec<(&mut AstNode, bool)> = vec![(&mut tree, false)];
        while let Some((node, member)) = stack.pop() {
            if !member && is_identifier_leaf(node) {
                if let Some(text) = node.text.as_deref() {
                    let token = self.map.token_for(text);
                    node.text = Some(token);
                }
            }
            let names_member = names_member(node);
            stack.extend(
                node.children
                    .iter_mut()
                    .rev()
                    .map(|child| {
                        let member = is_member_position(child, names_member);
                        (child, member)
                    }),
            );
        }
        Canonicalized {
            tree,
            map: self.map,
        }
    }
}

fn is_identifier_leaf(node: &AstNode) -> bool {
    node.named && node.is_leaf() && IDENTIFIER_KINDS.contains(&node.kind.as_str())
}

/// Whether `parent` holds a member name in its `name` field.
///
/// Java `method_invocation` only does with a receiver; `foo()` alone is a
/// plain call and its name is renamed.
fn names_member(parent: &AstNode) -> bool {
    match parent.kind.as_str() {
        "method_invocation" => parent.child_by_field("object").is_some(),
        kind => NAME_MEMBER_PARENTS.contains(&kind),
    }
}

fn is_member_position(node: &AstNode, parent_names_member: bool) -> bool {
    let field = node.field.as_deref();
    MEMBER_KINDS.contains(&node.kind.as_str())
        || field.is_some_and(|f| MEMBER_FIELDS.contains(&f))
        || (parent_names_member && field == Some("name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::to_canonical_text;
    use crate::language::Language;
    use crate::parsers::ParserRegistry;

    fn canon(code: &str, language: Language) -> Canonicalized {
        let registry = ParserRegistry::new();
        let tree = registry.parse(code, language).unwrap();
        Canonicalizer::new().canonicalize(tree)
    }

    fn leaves(tree: &AstNode) -> Vec<String> {
        tree.preorder()
            .filter(|n| n.is_leaf() && n.named)
            .filter_map(|n| n.text.clone())
            .collect()
    }

    #[test]
    fn renames_in_first_occurrence_order() {
        let out = canon("def add(a, b):\n    return a + b\n", Language::Python);
        assert_eq!(out.map.get("add"), Some("VAR_0"));
        assert_eq!(out.map.get("a"), Some("VAR_1"));
        assert_eq!(out.map.get("b"), Some("VAR_2"));
        assert_eq!(
            leaves(&out.tree),
            ["VAR_0", "VAR_1", "VAR_2", "VAR_1", "VAR_2"]
        );
    }

    #[test]
    fn member_names_are_kept() {
        let out = canon("import os\nos.system(cmd)\n", Language::Python);
        let text = to_canonical_text(&out.tree);
        assert!(text.contains("(identifier system)"));
        assert!(!text.contains("(identifier os)"));
        assert_eq!(out.map.get("system"), None);
    }

    #[test]
    fn javascript_property_identifiers_are_kept() {
        let out = canon("const el = document.cookie;\n", Language::JavaScript);
        let text = to_canonical_text(&out.tree);
        assert!(text.contains("(property_identifier cookie)"));
        assert_eq!(out.map.get("el"), Some("VAR_0"));
    }

    #[test]
    fn independent_units_both_start_at_zero() {
        let first = canon("def f(x):\n    return x\n", Language::Python);
        let second = canon("def g(y):\n    return y\n", Language::Python);
        assert_eq!(first.map.get("f"), Some("VAR_0"));
        assert_eq!(second.map.get("g"), Some("VAR_0"));
        assert_eq!(
            to_canonical_text(&first.tree),
            to_canonical_text(&second.tree)
        );
    }

    #[test]
    fn receiver_method_names_are_kept_across_languages() {
        let java = canon(
            "class A { void f(Runtime r, String c) { r.exec(c); } }",
            Language::Java,
        );
        assert!(to_canonical_text(&java.tree).contains("(identifier exec)"));

        let csharp = canon(
            "class A { void F(Process p, string c) { p.Start(c); } }",
            Language::CSharp,
        );
        assert!(to_canonical_text(&csharp.tree).contains("(identifier Start)"));

        let php = canon("<?php $o->system($c);", Language::Php);
        assert!(to_canonical_text(&php.tree).contains("(name system)"));
    }

    #[test]
    fn unqualified_java_call_is_renamed() {
        let out = canon("class A { void f() { g(); } }", Language::Java);
        assert!(out.map.get("g").is_some());
    }

    #[test]
    fn literals_are_untouched() {
        let out = canon("x = 'hello'\n", Language::Python);
        assert!(to_canonical_text(&out.tree).contains("hello"));
    }
}
