/*
 * matrix.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Sparse relation matrices over the node-id space of a traversal.
 *
 * All four relations come out of a single pass over the event stream that
 * keeps only the ancestor-id stack and the id of the last node exited.
 */

use std::convert::Infallible;

use serde::Serialize;

use crate::collections::NodeCollection;
use crate::cursor::Cursor;
use crate::error::TreeResult;
use crate::node::SyntaxNode;
use crate::traversals::{walk_tree_filtered, Event, EventKind};

/// A boolean matrix in coordinate form. Entries are sorted row-major and
/// unique; absent entries are false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SparseMatrix {
    shape: (usize, usize),
    entries: Vec<(usize, usize)>,
}

impl SparseMatrix {
    fn from_entries(shape: (usize, usize), mut entries: Vec<(usize, usize)>) -> Self {
        entries.sort_unstable();
        entries.dedup();
        SparseMatrix { shape, entries }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of true entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries.binary_search(&(row, col)).is_ok()
    }

    /// `(row, column)` of every true entry, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        self.entries.iter().copied()
    }

    /// Columns of the true entries in `row`, ascending.
    pub fn row(&self, row: usize) -> impl Iterator<Item = usize> {
        let start = self.entries.partition_point(|&(r, _)| r < row);
        let end = self.entries.partition_point(|&(r, _)| r <= row);
        self.entries[start..end].iter().map(|&(_, col)| col)
    }

    pub fn transpose(&self) -> SparseMatrix {
        let (rows, cols) = self.shape;
        SparseMatrix::from_entries(
            (cols, rows),
            self.entries.iter().map(|&(r, c)| (c, r)).collect(),
        )
    }
}

/// Parent/child and sibling relations of a (possibly pruned) tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyMatrices {
    parent_to_child: SparseMatrix,
    child_to_parent: SparseMatrix,
    next_sibling: SparseMatrix,
    prev_sibling: SparseMatrix,
}

impl AdjacencyMatrices {
    /// Build the relations for the subtree at the cursor, numbering kept
    /// nodes in preorder, the same order [`iternodes`](crate::iter::iternodes)
    /// yields them in.
    pub fn build<C, F>(cursor: C, keep: F) -> Self
    where
        C: Cursor,
        F: FnMut(&C::Node) -> bool,
    {
        let mut next_id = 0;
        let result = Self::assemble(walk_tree_filtered(cursor, keep), None, |_| {
            let id = next_id;
            next_id += 1;
            Ok::<usize, Infallible>(id)
        });
        match result {
            Ok(matrices) => matrices,
            Err(never) => match never {},
        }
    }

    /// Build the relations using ids from an existing collection.
    ///
    /// The matrices are [`NodeCollection::id_bound`] square. Fails with
    /// [`TreeError::UnknownNode`](crate::error::TreeError::UnknownNode) if a kept node is missing from `ids`.
    pub fn build_with_ids<C, F>(cursor: C, keep: F, ids: &NodeCollection<C::Node>) -> TreeResult<Self>
    where
        C: Cursor,
        C::Node: SyntaxNode,
        F: FnMut(&C::Node) -> bool,
    {
        Self::assemble(
            walk_tree_filtered(cursor, keep),
            Some(ids.id_bound()),
            |node| ids.id_of(node),
        )
    }

    fn assemble<N, I, L, E>(events: I, dimension: Option<usize>, mut lookup: L) -> Result<Self, E>
    where
        I: Iterator<Item = Event<N>>,
        L: FnMut(&N) -> Result<usize, E>,
    {
        let mut ancestors: Vec<usize> = Vec::new();
        let mut last_exited: Option<usize> = None;
        let mut edges = Vec::new();
        let mut siblings = Vec::new();
        let mut count = 0;

        for event in events {
            match event.kind {
                EventKind::EnterFirst | EventKind::EnterSibling => {
                    let id = lookup(&event.node)?;
                    count += 1;
                    if let Some(&parent) = ancestors.last() {
                        edges.push((parent, id));
                    }
                    if event.kind == EventKind::EnterSibling {
                        if let Some(previous) = last_exited {
                            siblings.push((previous, id));
                        }
                    }
                    ancestors.push(id);
                }
                EventKind::Exit => last_exited = ancestors.pop(),
            }
        }

        let dimension = dimension.unwrap_or(count);
        let shape = (dimension, dimension);
        let parent_to_child = SparseMatrix::from_entries(shape, edges);
        let next_sibling = SparseMatrix::from_entries(shape, siblings);
        tracing::debug!(
            nodes = count,
            dimension,
            edges = parent_to_child.nnz(),
            siblings = next_sibling.nnz(),
            "built adjacency matrices"
        );

        Ok(AdjacencyMatrices {
            child_to_parent: parent_to_child.transpose(),
            prev_sibling: next_sibling.transpose(),
            parent_to_child,
            next_sibling,
        })
    }

    /// Side length of the square matrices.
    pub fn node_count(&self) -> usize {
        self.parent_to_child.shape().0
    }

    /// Row = parent id, column = child id.
    pub fn parent_to_child(&self) -> &SparseMatrix {
        &self.parent_to_child
    }

    /// Row = child id, column = parent id.
    pub fn child_to_parent(&self) -> &SparseMatrix {
        &self.child_to_parent
    }

    /// Row = node id, column = id of its next sibling.
    pub fn next_sibling(&self) -> &SparseMatrix {
        &self.next_sibling
    }

    /// Row = node id, column = id of its previous sibling.
    pub fn prev_sibling(&self) -> &SparseMatrix {
        &self.prev_sibling
    }

    /// `(parent_to_child, child_to_parent, next_sibling, prev_sibling)`
    pub fn into_parts(self) -> (SparseMatrix, SparseMatrix, SparseMatrix, SparseMatrix) {
        (
            self.parent_to_child,
            self.child_to_parent,
            self.next_sibling,
            self.prev_sibling,
        )
    }
}
