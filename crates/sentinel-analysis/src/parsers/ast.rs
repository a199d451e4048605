//! Owned syntax tree converted from a tree-sitter parse.
//!
//! Tree-sitter trees borrow their source and cannot be edited, so the
//! canonicalizer, sanitizer, and feature extractor all work on this owned
//! form instead.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

/// Source location of a node. Rows and columns are 0-based, as tree-sitter reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
}

impl Span {
    pub fn from_ts_node(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_row: start.row as u32,
            start_column: start.column as u32,
            end_row: end.row as u32,
            end_column: end.column as u32,
        }
    }

    /// 1-based line of the node's first byte.
    pub fn line(&self) -> u32 {
        self.start_row + 1
    }
}

/// One node of an owned syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    /// Grammar node-type tag (`call`, `identifier`, `(`).
    pub kind: String,
    /// `false` for anonymous tokens such as punctuation and keywords.
    pub named: bool,
    /// Role of this node inside its parent (`name`, `attribute`, ...).
    pub field: Option<String>,
    /// Source text, kept for leaves only.
    pub text: Option<String>,
    pub children: Vec<AstNode>,
    pub position: Option<Span>,
}

impl AstNode {
    pub fn new(kind: impl Into<String>, named: bool) -> Self {
        Self {
            kind: kind.into(),
            named,
            field: None,
            text: None,
            children: Vec::new(),
            position: None,
        }
    }

    fn from_ts_node(node: Node, field: Option<&str>, source: &[u8]) -> Self {
        let text = if node.child_count() == 0 {
            node.utf8_text(source).ok().map(str::to_owned)
        } else {
            None
        };
        Self {
            kind: node.kind().to_string(),
            named: node.is_named(),
            field: field.map(str::to_owned),
            text,
            children: Vec::with_capacity(node.child_count()),
            position: Some(Span::from_ts_node(&node)),
        }
    }

    /// Convert a tree-sitter tree into an owned tree.
    ///
    /// Iterative, so adversarially deep inputs cannot overflow the stack.
    pub fn from_tree(tree: &Tree, source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut cursor = tree.walk();
        let mut ancestors: Vec<AstNode> = Vec::new();
        let mut current = Self::from_ts_node(cursor.node(), None, bytes);

        loop {
            if cursor.goto_first_child() {
                let child = Self::from_ts_node(cursor.node(), cursor.field_name(), bytes);
                ancestors.push(std::mem::replace(&mut current, child));
                continue;
            }
            loop {
                let Some(mut parent) = ancestors.pop() else {
                    return current;
                };
                parent.children.push(current);
                if cursor.goto_next_sibling() {
                    ancestors.push(parent);
                    current = Self::from_ts_node(cursor.node(), cursor.field_name(), bytes);
                    break;
                }
                cursor.goto_parent();
                current = parent;
            }
        }
    }

    /// Comment nodes across grammars: `comment`, `line_comment`, `block_comment`, ...
    pub fn is_comment(&self) -> bool {
        self.kind == "comment" || self.kind.ends_with("_comment")
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First child playing the given field role.
    pub fn child_by_field(&self, field: &str) -> Option<&AstNode> {
        self.children
            .iter()
            .find(|c| c.field.as_deref() == Some(field))
    }

    /// Concatenated leaf text of this subtree, without separators.
    pub fn leaf_text(&self) -> String {
        self.preorder()
            .filter_map(|n| n.text.as_deref())
            .collect()
    }

    /// Pre-order iterator over this subtree.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }
}

impl Drop for AstNode {
    // Flatten before dropping; the derived recursive drop would follow the
    // tree depth on the call stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: &str, text: &str) -> AstNode {
        let mut n = AstNode::new(kind, true);
        n.text = Some(text.to_string());
        n
    }

    #[test]
    fn preorder_visits_parent_before_children_left_to_right() {
        let mut root = AstNode::new("module", true);
        let mut call = AstNode::new("call", true);
        call.children.push(leaf("identifier", "f"));
        call.children.push(leaf("argument_list", "()"));
        root.children.push(call);
        root.children.push(leaf("comment", "# x"));

        let kinds: Vec<&str> = root.preorder().map(|n| n.kind.as_str()).collect();
        assert_eq!(kinds, ["module", "call", "identifier", "argument_list", "comment"]);
        assert_eq!(root.node_count(), 5);
        assert_eq!(root.leaf_text(), "f()# x");
    }

    #[test]
    fn deep_tree_drops_without_overflow() {
        let mut root = AstNode::new("expr", true);
        for _ in 0..200_000 {
            let mut parent = AstNode::new("expr", true);
            parent.children.push(root);
            root = parent;
        }
        drop(root);
    }

    #[test]
    fn span_line_is_one_based() {
        let span = Span {
            start_byte: 0,
            end_byte: 1,
            start_row: 0,
            start_column: 0,
            end_row: 0,
            end_column: 1,
        };
        assert_eq!(span.line(), 1);
    }
}
