/*
 * tree.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * An in-memory tree that honors the cursor contract.
 *
 * Useful for exercising traversals without a tree-sitter grammar, and for
 * callers that already hold a tree in some other shape and want to reuse
 * the traversal utilities over it.
 */

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Peekable;
use std::str::CharIndices;

use crate::cursor::Cursor;
use crate::error::{TreeError, TreeResult};
use crate::node::SyntaxNode;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    kind: String,
    named: bool,
    parent: Option<usize>,
    first_child: Option<usize>,
    last_child: Option<usize>,
    next_sibling: Option<usize>,
    child_count: usize,
}

impl Slot {
    fn new(kind: String, named: bool, parent: Option<usize>) -> Self {
        Slot {
            kind,
            named,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            child_count: 0,
        }
    }
}

/// An owned tree stored as an arena of linked slots. Slot 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedTree {
    slots: Vec<Slot>,
}

impl OwnedTree {
    /// Parse a tree from an s-expression.
    ///
    /// The grammar is `tree := atom | '(' atom tree* ')'`. Bare atoms are
    /// named nodes; `"quoted"` atoms are anonymous nodes. Both
    /// `(1 (2 3) (4 5))` and `(1 (2 (3)) (4 (5)))` describe the same tree.
    pub fn from_sexp(source: &str) -> TreeResult<Self> {
        let mut lexer = Lexer::new(source);
        let mut builder: Option<TreeBuilder> = None;
        let mut open: Vec<usize> = Vec::new();

        while let Some((offset, token)) = lexer.next_token()? {
            match token {
                Token::Open => {
                    let Some((_, Token::Atom { text, named })) = lexer.next_token()? else {
                        return Err(parse_error(offset, "expected a node kind after '('"));
                    };
                    let index = attach(&mut builder, &open, offset, text, named)?;
                    open.push(index);
                }
                Token::Close => {
                    if open.pop().is_none() {
                        return Err(parse_error(offset, "unbalanced ')'"));
                    }
                }
                Token::Atom { text, named } => {
                    attach(&mut builder, &open, offset, text, named)?;
                }
            }
        }

        if !open.is_empty() {
            return Err(parse_error(source.len(), "unclosed '('"));
        }
        builder
            .map(TreeBuilder::build)
            .ok_or_else(|| parse_error(source.len(), "empty input"))
    }

    pub fn root(&self) -> OwnedNode<'_> {
        OwnedNode {
            tree: self,
            index: 0,
        }
    }

    /// A cursor positioned at the root.
    pub fn walk(&self) -> OwnedCursor<'_> {
        self.root().walk()
    }

    pub fn node(&self, index: usize) -> Option<OwnedNode<'_>> {
        (index < self.slots.len()).then_some(OwnedNode { tree: self, index })
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }
}

fn attach(
    builder: &mut Option<TreeBuilder>,
    open: &[usize],
    offset: usize,
    kind: String,
    named: bool,
) -> TreeResult<usize> {
    match (builder.as_mut(), open.last()) {
        (None, _) => {
            let mut root = TreeBuilder::new(kind);
            root.slots[TreeBuilder::ROOT].named = named;
            *builder = Some(root);
            Ok(TreeBuilder::ROOT)
        }
        (Some(b), Some(&parent)) => Ok(b.push(parent, kind, named)),
        (Some(_), None) => Err(parse_error(offset, "trailing input after the root node")),
    }
}

fn parse_error(offset: usize, message: &str) -> TreeError {
    TreeError::SexpParse {
        offset,
        message: message.to_string(),
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Atom { text: String, named: bool },
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> TreeResult<Option<(usize, Token)>> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((offset, c)) = self.chars.next() else {
            return Ok(None);
        };
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '"' => Token::Atom {
                text: self.quoted(offset)?,
                named: false,
            },
            _ => {
                let mut text = String::from(c);
                while let Some((_, c)) = self
                    .chars
                    .next_if(|&(_, c)| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'))
                {
                    text.push(c);
                }
                Token::Atom { text, named: true }
            }
        };
        Ok(Some((offset, token)))
    }

    fn quoted(&mut self, start: usize) -> TreeResult<String> {
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(text),
                '\\' => match self.chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                _ => text.push(c),
            }
        }
        Err(parse_error(start, "unterminated string"))
    }
}

/// Builds an [`OwnedTree`] by appending children in sibling order.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    slots: Vec<Slot>,
}

impl TreeBuilder {
    /// Index of the root node.
    pub const ROOT: usize = 0;

    pub fn new(kind: impl Into<String>) -> Self {
        TreeBuilder {
            slots: vec![Slot::new(kind.into(), true, None)],
        }
    }

    /// Append a named child to `parent`, returning the child's index.
    ///
    /// # Panics
    /// Panics if `parent` is not an index previously returned by this builder.
    pub fn child(&mut self, parent: usize, kind: impl Into<String>) -> usize {
        self.push(parent, kind.into(), true)
    }

    /// Append an anonymous child to `parent`, returning the child's index.
    ///
    /// # Panics
    /// Panics if `parent` is not an index previously returned by this builder.
    pub fn anonymous_child(&mut self, parent: usize, kind: impl Into<String>) -> usize {
        self.push(parent, kind.into(), false)
    }

    fn push(&mut self, parent: usize, kind: String, named: bool) -> usize {
        let index = self.slots.len();
        let previous = self.slots[parent].last_child;
        self.slots.push(Slot::new(kind, named, Some(parent)));

        let parent_slot = &mut self.slots[parent];
        parent_slot.last_child = Some(index);
        parent_slot.child_count += 1;
        match previous {
            Some(previous) => self.slots[previous].next_sibling = Some(index),
            None => self.slots[parent].first_child = Some(index),
        }
        index
    }

    pub fn build(self) -> OwnedTree {
        OwnedTree { slots: self.slots }
    }
}

/// A borrowed handle to a node of an [`OwnedTree`].
///
/// Two handles are equal when they refer to the same slot of the same tree.
#[derive(Clone, Copy)]
pub struct OwnedNode<'t> {
    tree: &'t OwnedTree,
    index: usize,
}

impl<'t> OwnedNode<'t> {
    fn slot(&self) -> &'t Slot {
        &self.tree.slots[self.index]
    }

    fn at(&self, index: Option<usize>) -> Option<OwnedNode<'t>> {
        index.map(|index| OwnedNode {
            tree: self.tree,
            index,
        })
    }

    /// The node's kind, borrowed for the lifetime of the tree.
    pub fn label(&self) -> &'t str {
        &self.slot().kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent(&self) -> Option<OwnedNode<'t>> {
        self.at(self.slot().parent)
    }

    pub fn first_child(&self) -> Option<OwnedNode<'t>> {
        self.at(self.slot().first_child)
    }

    pub fn next_sibling(&self) -> Option<OwnedNode<'t>> {
        self.at(self.slot().next_sibling)
    }

    pub fn children(&self) -> impl Iterator<Item = OwnedNode<'t>> {
        std::iter::successors(self.first_child(), OwnedNode::next_sibling)
    }

    /// A cursor rooted at this node. It cannot move above or beside it.
    pub fn walk(&self) -> OwnedCursor<'t> {
        OwnedCursor {
            tree: self.tree,
            root: self.index,
            index: self.index,
        }
    }
}

impl PartialEq for OwnedNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for OwnedNode<'_> {}

impl Hash for OwnedNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for OwnedNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedNode({}#{})", self.label(), self.index)
    }
}

impl SyntaxNode for OwnedNode<'_> {
    fn id(&self) -> usize {
        self.index
    }

    fn kind(&self) -> &str {
        self.label()
    }

    fn is_named(&self) -> bool {
        self.slot().named
    }

    fn child_count(&self) -> usize {
        self.slot().child_count
    }
}

/// A cursor over an [`OwnedTree`]. Cloning produces an independent position.
#[derive(Debug, Clone)]
pub struct OwnedCursor<'t> {
    tree: &'t OwnedTree,
    root: usize,
    index: usize,
}

impl<'t> OwnedCursor<'t> {
    fn goto(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    fn slot(&self) -> &'t Slot {
        &self.tree.slots[self.index]
    }
}

impl<'t> Cursor for OwnedCursor<'t> {
    type Node = OwnedNode<'t>;

    fn current(&self) -> OwnedNode<'t> {
        OwnedNode {
            tree: self.tree,
            index: self.index,
        }
    }

    fn descend(&mut self) -> bool {
        self.goto(self.slot().first_child)
    }

    fn advance(&mut self) -> bool {
        if self.index == self.root {
            return false;
        }
        self.goto(self.slot().next_sibling)
    }

    fn ascend(&mut self) -> bool {
        if self.index == self.root {
            return false;
        }
        self.goto(self.slot().parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cursor_moves() {
        let tree = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        let mut cursor = tree.walk();
        assert_eq!(cursor.current().label(), "1");

        assert!(cursor.descend());
        assert_eq!(cursor.current().label(), "2");
        assert!(cursor.ascend());
        assert_eq!(cursor.current().label(), "1");

        assert!(!cursor.advance());
        assert!(!cursor.ascend());
        assert_eq!(cursor.current().label(), "1");

        assert!(cursor.descend());
        assert!(cursor.advance());
        assert_eq!(cursor.current().label(), "4");
        assert!(cursor.descend());
        assert_eq!(cursor.current().label(), "5");
        assert!(!cursor.descend());
        assert!(!cursor.advance());
        assert_eq!(cursor.current().label(), "5");
        assert!(cursor.ascend());
        assert!(cursor.ascend());
        assert_eq!(cursor.current().label(), "1");
    }

    #[test]
    fn test_cursor_clone_is_independent() {
        let tree = OwnedTree::from_sexp("(1 2 3)").unwrap();
        let mut original = tree.walk();
        assert!(original.descend());

        let copied = original.clone();
        assert_eq!(original.current(), copied.current());
        assert!(original.ascend());
        assert_eq!(copied.current().label(), "2");
    }

    #[test]
    fn test_node_walk_is_rooted_at_node() {
        let tree = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        let two = tree.root().first_child().unwrap();
        let mut cursor = two.walk();
        assert!(!cursor.advance());
        assert!(!cursor.ascend());
        assert!(cursor.descend());
        assert_eq!(cursor.current().label(), "3");
        assert!(cursor.ascend());
        assert_eq!(cursor.current(), two);
    }

    #[test]
    fn test_parse_leaf_forms_are_equivalent() {
        let bare = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        let wrapped = OwnedTree::from_sexp("(1 (2 (3)) (4 (5)))").unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.node_count(), 5);
    }

    #[test]
    fn test_parse_anonymous_atoms() {
        let tree = OwnedTree::from_sexp(r#"(binary (number) "+" (number))"#).unwrap();
        let kinds: Vec<(&str, bool)> = tree
            .root()
            .children()
            .map(|n| (n.label(), n.is_named()))
            .collect();
        assert_eq!(kinds, vec![("number", true), ("+", false), ("number", true)]);
    }

    #[test]
    fn test_parse_single_atom() {
        let tree = OwnedTree::from_sexp("  leaf ").unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().label(), "leaf");
        assert_eq!(tree.root().child_count(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            OwnedTree::from_sexp("(1 (2)"),
            Err(TreeError::SexpParse {
                offset: 6,
                message: "unclosed '('".to_string()
            })
        );
        assert_eq!(
            OwnedTree::from_sexp("(1))"),
            Err(TreeError::SexpParse {
                offset: 3,
                message: "unbalanced ')'".to_string()
            })
        );
        assert!(matches!(
            OwnedTree::from_sexp("(1) (2)"),
            Err(TreeError::SexpParse { offset: 4, .. })
        ));
        assert!(matches!(
            OwnedTree::from_sexp("(())"),
            Err(TreeError::SexpParse { offset: 0, .. })
        ));
        assert!(matches!(
            OwnedTree::from_sexp(r#"(1 "open)"#),
            Err(TreeError::SexpParse { offset: 3, .. })
        ));
        assert!(matches!(
            OwnedTree::from_sexp("   "),
            Err(TreeError::SexpParse { offset: 3, .. })
        ));
    }

    #[test]
    fn test_builder_appends_in_order() {
        let mut builder = TreeBuilder::new("root");
        let a = builder.child(TreeBuilder::ROOT, "a");
        builder.anonymous_child(TreeBuilder::ROOT, ";");
        builder.child(a, "b");
        let tree = builder.build();

        let root = tree.root();
        assert_eq!(root.child_count(), 2);
        let labels: Vec<&str> = root.children().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["a", ";"]);
        let b = tree.node(3).unwrap();
        assert_eq!(b.parent(), tree.node(a));
        assert!(tree.node(4).is_none());
    }
}
