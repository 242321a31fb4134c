/*
 * cursor.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * The three-move cursor contract that every traversal in this crate is
 * written against.
 */

use tree_sitter::{Node, TreeCursor};

/// A single mutable position within a tree.
///
/// Implementations must guarantee that a failed move leaves the position
/// unchanged, and that moving has no side effects beyond the position change.
///
/// Node identity must be stable across moves: returning to a node through
/// `ascend` must produce a node equal to the one previously reached through
/// `descend`/`advance`. Traversal results are undefined otherwise.
pub trait Cursor {
    type Node;

    /// The node at the current position.
    fn current(&self) -> Self::Node;

    /// Move to the first child of the current node.
    fn descend(&mut self) -> bool;

    /// Move to the next sibling of the current node.
    fn advance(&mut self) -> bool;

    /// Move to the parent of the current node.
    fn ascend(&mut self) -> bool;

    /// Name of the field the current node occupies in its parent, if any.
    fn field_name(&self) -> Option<&'static str> {
        None
    }
}

impl<'tree> Cursor for TreeCursor<'tree> {
    type Node = Node<'tree>;

    fn current(&self) -> Node<'tree> {
        self.node()
    }

    fn descend(&mut self) -> bool {
        self.goto_first_child()
    }

    fn advance(&mut self) -> bool {
        self.goto_next_sibling()
    }

    fn ascend(&mut self) -> bool {
        self.goto_parent()
    }

    fn field_name(&self) -> Option<&'static str> {
        TreeCursor::field_name(self)
    }
}

/// Lets traversals borrow a cursor instead of consuming it, so the caller
/// keeps the position once the traversal is dropped.
impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Node = C::Node;

    fn current(&self) -> Self::Node {
        (**self).current()
    }

    fn descend(&mut self) -> bool {
        (**self).descend()
    }

    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn ascend(&mut self) -> bool {
        (**self).ascend()
    }

    fn field_name(&self) -> Option<&'static str> {
        (**self).field_name()
    }
}
