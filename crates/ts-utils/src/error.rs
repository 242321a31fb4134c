/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for tree construction and node lookup.
//!
//! Traversals themselves never fail: a cursor that reports unstable node
//! identities is a caller contract violation, not a reported error.

use thiserror::Error;

/// Errors that can occur outside of the traversal engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Error parsing an s-expression into an [`OwnedTree`](crate::tree::OwnedTree).
    #[error("S-expression parse error at offset {offset}: {message}")]
    SexpParse { offset: usize, message: String },

    /// A node was looked up in a [`NodeCollection`](crate::collections::NodeCollection)
    /// that does not contain it.
    #[error("Node {id} not found in node collection")]
    UnknownNode { id: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
