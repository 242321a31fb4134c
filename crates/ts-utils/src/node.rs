/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node capabilities consumed by predicates, collections and matrices.

use tree_sitter::Node;

/// The read-only view of a syntax node used outside the traversal engine.
pub trait SyntaxNode {
    /// Identifier that is unique within a tree and stable for its lifetime.
    fn id(&self) -> usize;

    /// The node's type tag.
    fn kind(&self) -> &str;

    /// Whether the node is named (as opposed to an anonymous token).
    fn is_named(&self) -> bool;

    fn child_count(&self) -> usize;
}

impl SyntaxNode for Node<'_> {
    fn id(&self) -> usize {
        Node::id(self)
    }

    fn kind(&self) -> &str {
        Node::kind(self)
    }

    fn is_named(&self) -> bool {
        Node::is_named(self)
    }

    fn child_count(&self) -> usize {
        Node::child_count(self)
    }
}
