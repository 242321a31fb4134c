/*
 * iter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node iterators built on the traversal event stream.
//!
//! All pruned iterators share one traversal engine, so for a given cursor
//! position and filter they yield nodes in the same order:
//!
//! ```
//! use ts_utils::{iternodes, iternodes_with_parent, predicates::named_only, OwnedTree};
//!
//! let tree = OwnedTree::from_sexp(r#"(expr (lhs) "=" (rhs (value)))"#).unwrap();
//! let a: Vec<_> = iternodes(tree.walk(), named_only).collect();
//! let b: Vec<_> = iternodes_with_parent(tree.walk(), named_only)
//!     .map(|(node, _)| node)
//!     .collect();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 4);
//! ```
//!
//! For sequential indexes alongside the nodes, use
//! `iternodes(cursor, keep).enumerate()`.

use crate::cursor::Cursor;
use crate::predicates::always;
use crate::traversals::{try_walk_tree, walk_tree_filtered, WalkTree};

/// Kept nodes in preorder. Created by [`iternodes`].
pub struct IterNodes<C, F> {
    events: WalkTree<C, F>,
}

impl<C, F> Iterator for IterNodes<C, F>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
    type Item = C::Node;

    fn next(&mut self) -> Option<C::Node> {
        loop {
            let event = self.events.next()?;
            if event.is_enter() {
                return Some(event.node);
            }
        }
    }
}

/// Preorder traversal starting from the position of the cursor.
///
/// The node at the cursor's position is the root of the traversal. Nodes for
/// which `keep` returns false are skipped together with their entire subtree,
/// without the traversal ever moving into it. Pass
/// [`always`](crate::predicates::always) to visit everything.
pub fn iternodes<C, F>(cursor: C, keep: F) -> IterNodes<C, F>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
    IterNodes {
        events: walk_tree_filtered(cursor, keep),
    }
}

/// Kept nodes in postorder: every node after all of its kept descendants.
pub fn iternodes_postorder<C, F>(cursor: C, keep: F) -> impl Iterator<Item = C::Node>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
    walk_tree_filtered(cursor, keep).filter_map(|event| event.is_exit().then_some(event.node))
}

/// Preorder traversal with a fallible filter.
///
/// The first error from `keep` is yielded and ends the iteration; nodes
/// already yielded stay valid.
pub fn try_iternodes<C, F, E>(cursor: C, keep: F) -> impl Iterator<Item = Result<C::Node, E>>
where
    C: Cursor,
    F: FnMut(&C::Node) -> Result<bool, E>,
{
    try_walk_tree(cursor, keep).filter_map(|event| match event {
        Ok(event) if event.is_enter() => Some(Ok(event.node)),
        Ok(_) => None,
        Err(error) => Some(Err(error)),
    })
}

/// Kept nodes in preorder, each paired with its nearest kept ancestor that
/// may act as a parent. Created by [`iternodes_with_parent`] and
/// [`iternodes_with_filtered_parent`].
pub struct IterNodesWithParent<C: Cursor, F, G> {
    events: WalkTree<C, F>,
    parent_filter: G,
    ancestors: Vec<C::Node>,
}

impl<C, F, G> Iterator for IterNodesWithParent<C, F, G>
where
    C: Cursor,
    C::Node: Clone + PartialEq,
    F: FnMut(&C::Node) -> bool,
    G: FnMut(&C::Node) -> bool,
{
    type Item = (C::Node, Option<C::Node>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.events.next()?;
            if event.is_enter() {
                let parent = self.ancestors.last().cloned();
                if (self.parent_filter)(&event.node) {
                    self.ancestors.push(event.node.clone());
                }
                return Some((event.node, parent));
            }
            if self.ancestors.last() == Some(&event.node) {
                self.ancestors.pop();
            }
        }
    }
}

/// Like [`iternodes`], also yielding each node's parent (`None` for the
/// traversal root).
pub fn iternodes_with_parent<C, F>(
    cursor: C,
    keep: F,
) -> IterNodesWithParent<C, F, fn(&C::Node) -> bool>
where
    C: Cursor,
    C::Node: Clone + PartialEq,
    F: FnMut(&C::Node) -> bool,
{
    iternodes_with_filtered_parent(cursor, keep, always as fn(&C::Node) -> bool)
}

/// Like [`iternodes_with_parent`], but only nodes passing `parent_filter`
/// can serve as parents. A node whose parent is rejected is paired with
/// the nearest accepted ancestor instead.
pub fn iternodes_with_filtered_parent<C, F, G>(
    cursor: C,
    keep: F,
    parent_filter: G,
) -> IterNodesWithParent<C, F, G>
where
    C: Cursor,
    C::Node: Clone + PartialEq,
    F: FnMut(&C::Node) -> bool,
    G: FnMut(&C::Node) -> bool,
{
    IterNodesWithParent {
        events: walk_tree_filtered(cursor, keep),
        parent_filter,
        ancestors: Vec::new(),
    }
}

/// Kept nodes in preorder with their kept parent and the field name of the
/// edge leading to them. Created by [`iternodes_with_edges`].
pub struct IterNodesWithEdges<C: Cursor, F> {
    events: WalkTree<C, F>,
    ancestors: Vec<C::Node>,
}

impl<C, F> Iterator for IterNodesWithEdges<C, F>
where
    C: Cursor,
    C::Node: Clone + PartialEq,
    F: FnMut(&C::Node) -> bool,
{
    type Item = (C::Node, Option<C::Node>, Option<&'static str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.events.next()?;
            if event.is_enter() {
                // the walk has not moved off the entered node yet
                let field = self.events.cursor().field_name();
                let parent = self.ancestors.last().cloned();
                self.ancestors.push(event.node.clone());
                return Some((event.node, parent, field));
            }
            if self.ancestors.last() == Some(&event.node) {
                self.ancestors.pop();
            }
        }
    }
}

/// Like [`iternodes_with_parent`], also yielding the name of the field each
/// node occupies in its parent, as reported by [`Cursor::field_name`].
pub fn iternodes_with_edges<C, F>(cursor: C, keep: F) -> IterNodesWithEdges<C, F>
where
    C: Cursor,
    C::Node: Clone + PartialEq,
    F: FnMut(&C::Node) -> bool,
{
    IterNodesWithEdges {
        events: walk_tree_filtered(cursor, keep),
        ancestors: Vec::new(),
    }
}

/// Children of a node in order. Created by [`iterchildren`].
pub struct IterChildren<C> {
    cursor: C,
    state: ChildrenState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildrenState {
    Start,
    Inside,
    Done,
}

impl<C: Cursor> Iterator for IterChildren<C> {
    type Item = C::Node;

    fn next(&mut self) -> Option<C::Node> {
        let moved = match self.state {
            ChildrenState::Start => self.cursor.descend(),
            ChildrenState::Inside => {
                let moved = self.cursor.advance();
                if !moved {
                    self.cursor.ascend();
                }
                moved
            }
            ChildrenState::Done => false,
        };
        if moved {
            self.state = ChildrenState::Inside;
            Some(self.cursor.current())
        } else {
            self.state = ChildrenState::Done;
            None
        }
    }
}

/// Children of the node at the cursor, in order.
///
/// The cursor is moved back to that node once the children are exhausted.
pub fn iterchildren<C: Cursor>(cursor: C) -> IterChildren<C> {
    IterChildren {
        cursor,
        state: ChildrenState::Start,
    }
}

/// Siblings following the node at the cursor.
pub fn itersiblings<C: Cursor>(mut cursor: C) -> impl Iterator<Item = C::Node> {
    std::iter::from_fn(move || cursor.advance().then(|| cursor.current()))
}

/// Ancestors of the node at the cursor, from its parent up to the root of
/// the subtree the cursor was created from.
pub fn iterancestors<C: Cursor>(mut cursor: C) -> impl Iterator<Item = C::Node> {
    std::iter::from_fn(move || cursor.ascend().then(|| cursor.current()))
}
