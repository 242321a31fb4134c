/*
 * predicates.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ready-made traversal filters.
//!
//! A filter decides at ENTER time whether a node and its whole subtree take
//! part in a traversal. Filters are assumed pure; a filter with side effects
//! breaks the guarantee that independent traversals agree element by element.

use crate::node::SyntaxNode;

/// Keeps every node.
pub fn always<N: ?Sized>(_: &N) -> bool {
    true
}

/// Keeps named nodes, pruning anonymous tokens.
pub fn named_only<N: SyntaxNode>(node: &N) -> bool {
    node.is_named()
}

pub fn is_leaf<N: SyntaxNode>(node: &N) -> bool {
    node.child_count() == 0
}

/// Keeps nodes whose kind is one of `kinds`.
pub fn of_kind<'k, N: SyntaxNode>(kinds: &'k [&'k str]) -> impl Fn(&N) -> bool {
    move |node: &N| kinds.iter().any(|kind| *kind == node.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::OwnedTree;

    #[test]
    fn test_predicates() {
        let tree = OwnedTree::from_sexp(r#"(call (name) "(" (args) ")")"#).unwrap();
        let root = tree.root();
        let children: Vec<_> = root.children().collect();

        assert!(always(&root));
        assert!(named_only(&children[0]));
        assert!(!named_only(&children[1]));
        assert!(is_leaf(&children[2]));
        assert!(!is_leaf(&root));

        let calls_or_args = of_kind(&["call", "args"]);
        assert!(calls_or_args(&root));
        assert!(!calls_or_args(&children[0]));
        assert!(calls_or_args(&children[2]));
    }
}
