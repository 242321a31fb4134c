/*
 * collections.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node-keyed containers.
//!
//! Nodes are keyed by [`SyntaxNode::id`], so two handles to the same node
//! obtained from different cursors map to the same entry.

use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxBuildHasher;

use crate::error::{TreeError, TreeResult};
use crate::node::SyntaxNode;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A collection of nodes with sequential ids, in insertion order.
///
/// Ids come from a counter that only moves forward: removing a node does
/// not renumber the others.
///
/// ```
/// use ts_utils::{iternodes, predicates::always, NodeCollection, OwnedTree};
///
/// let tree = OwnedTree::from_sexp("(1 (2 3) 4)").unwrap();
/// let collection: NodeCollection<_> = iternodes(tree.walk(), always).collect();
/// assert_eq!(collection.get(&tree.root()), Some(0));
/// assert_eq!(collection.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct NodeCollection<N> {
    nodes: FxIndexMap<usize, (N, usize)>,
    next_id: usize,
}

impl<N> Default for NodeCollection<N> {
    fn default() -> Self {
        NodeCollection {
            nodes: IndexMap::default(),
            next_id: 0,
        }
    }
}

impl<N: SyntaxNode> NodeCollection<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its id. A node already present keeps its id.
    pub fn add(&mut self, node: N) -> usize {
        match self.nodes.entry(node.id()) {
            Entry::Occupied(entry) => entry.get().1,
            Entry::Vacant(entry) => {
                let id = self.next_id;
                self.next_id += 1;
                entry.insert((node, id));
                id
            }
        }
    }

    pub fn get(&self, node: &N) -> Option<usize> {
        self.nodes.get(&node.id()).map(|(_, id)| *id)
    }

    /// Like [`get`](Self::get), reporting a missing node as an error.
    pub fn id_of(&self, node: &N) -> TreeResult<usize> {
        self.get(node)
            .ok_or(TreeError::UnknownNode { id: node.id() })
    }

    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(&node.id())
    }

    /// Remove a node, returning the id it had.
    pub fn remove(&mut self, node: &N) -> Option<usize> {
        self.nodes.shift_remove(&node.id()).map(|(_, id)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// One past the largest id ever handed out.
    pub fn id_bound(&self) -> usize {
        self.next_id
    }

    /// `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &N)> {
        self.nodes.values().map(|(node, id)| (*id, node))
    }
}

impl<N: SyntaxNode> FromIterator<N> for NodeCollection<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut collection = NodeCollection::new();
        for node in iter {
            collection.add(node);
        }
        collection
    }
}

/// A map from nodes to values, in insertion order.
#[derive(Debug, Clone)]
pub struct NodeMap<N, V> {
    entries: FxIndexMap<usize, (N, V)>,
}

impl<N, V> Default for NodeMap<N, V> {
    fn default() -> Self {
        NodeMap {
            entries: IndexMap::default(),
        }
    }
}

impl<N: SyntaxNode, V> NodeMap<N, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for `node`, returning the value it replaces.
    pub fn insert(&mut self, node: N, value: V) -> Option<V> {
        self.entries
            .insert(node.id(), (node, value))
            .map(|(_, previous)| previous)
    }

    pub fn get(&self, node: &N) -> Option<&V> {
        self.entries.get(&node.id()).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, node: &N) -> Option<&mut V> {
        self.entries.get_mut(&node.id()).map(|(_, value)| value)
    }

    pub fn remove(&mut self, node: &N) -> Option<V> {
        self.entries
            .shift_remove(&node.id())
            .map(|(_, value)| value)
    }

    pub fn contains(&self, node: &N) -> bool {
        self.entries.contains_key(&node.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &V)> {
        self.entries.values().map(|(node, value)| (node, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &N> {
        self.entries.values().map(|(node, _)| node)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|(_, value)| value)
    }
}

impl<N: SyntaxNode, V> FromIterator<(N, V)> for NodeMap<N, V> {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = NodeMap::new();
        for (node, value) in iter {
            map.insert(node, value);
        }
        map
    }
}
