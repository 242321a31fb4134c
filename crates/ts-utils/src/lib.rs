/*
 * lib.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * ts-utils: Cursor-driven traversal utilities for tree-sitter trees.
 *
 * This crate provides:
 *
 * - A minimal-move depth-first traversal engine over a three-move cursor
 *   (first child, next sibling, parent) producing ENTER/EXIT events
 * - Pruned preorder, postorder, parent-tracked and field-tracked node iterators
 * - Sparse parent/child and sibling adjacency matrices
 * - Node-keyed collections, ready-made filters and s-expression printing
 * - An in-memory tree for use without a grammar
 *
 * Everything is read-only: no traversal mutates the tree it walks.
 */

pub mod collections;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod matrix;
pub mod node;
pub mod predicates;
pub mod sexp;
pub mod traversals;
pub mod tree;

// Re-export commonly used items at crate root
pub use collections::{NodeCollection, NodeMap};
pub use cursor::Cursor;
pub use error::{TreeError, TreeResult};
pub use iter::{
    iterancestors, iterchildren, iternodes, iternodes_postorder, iternodes_with_edges,
    iternodes_with_filtered_parent, iternodes_with_parent, itersiblings, try_iternodes,
    IterChildren, IterNodes, IterNodesWithEdges, IterNodesWithParent,
};
pub use matrix::{AdjacencyMatrices, SparseMatrix};
pub use node::SyntaxNode;
pub use sexp::{sexp, sexp_with, SexpOptions};
pub use traversals::{
    fold_bottom_up, try_walk_tree, walk_tree, walk_tree_filtered, with_depth, Event, EventKind,
    TraversePhase, TryWalkTree, WalkTree, WithDepth,
};
pub use tree::{OwnedCursor, OwnedNode, OwnedTree, TreeBuilder};
