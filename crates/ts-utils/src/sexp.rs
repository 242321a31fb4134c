/*
 * sexp.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Pretty-printed s-expressions for syntax trees.
 *
 * Similar to tree-sitter's `Node::to_sexp`, but subtrees that do not fit
 * within the wrap width are broken across indented lines.
 */

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::node::SyntaxNode;
use crate::predicates::always;
use crate::traversals::walk_tree_filtered;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SexpOptions {
    /// Subtrees whose one-line form is at least this long are split.
    pub wrap: usize,
    /// Spaces per nesting level in split output.
    pub indent: usize,
    /// Drop anonymous nodes, splicing any named descendants into the parent.
    pub named_only: bool,
    /// Prefix nodes that occupy a field of their parent with `name: `.
    pub fields: bool,
}

impl Default for SexpOptions {
    fn default() -> Self {
        SexpOptions {
            wrap: 50,
            indent: 2,
            named_only: true,
            fields: true,
        }
    }
}

/// Lines of one rendered subtree.
type Block = Vec<String>;

/// A node whose subtree is still being rendered.
struct Frame {
    /// `None` for a node spliced out of the output.
    head: Option<String>,
    children: Vec<Block>,
}

/// Render the subtree rooted at the cursor's position, labelling each node
/// with its kind.
pub fn sexp<C>(cursor: C, options: &SexpOptions) -> String
where
    C: Cursor,
    C::Node: SyntaxNode,
{
    sexp_with(cursor, options, |node: &C::Node| node.kind().to_string())
}

/// Like [`sexp`], with node labels produced by `label`.
pub fn sexp_with<C, L>(cursor: C, options: &SexpOptions, mut label: L) -> String
where
    C: Cursor,
    C::Node: SyntaxNode,
    L: FnMut(&C::Node) -> String,
{
    let mut events = walk_tree_filtered(cursor, always);
    let mut stack: Vec<Frame> = Vec::new();
    let mut output: Vec<Block> = Vec::new();

    while let Some(event) = events.next() {
        if event.is_enter() {
            let head = if options.named_only && !event.node.is_named() {
                None
            } else {
                let text = label(&event.node);
                let field = options.fields.then(|| events.cursor().field_name()).flatten();
                Some(match field {
                    Some(field) => format!("{field}: ({text}"),
                    None => format!("({text}"),
                })
            };
            stack.push(Frame {
                head,
                children: Vec::new(),
            });
            continue;
        }

        let Some(frame) = stack.pop() else {
            break;
        };
        let blocks = match frame.head {
            Some(head) => vec![render(head, frame.children, options)],
            None => frame.children,
        };
        match stack.last_mut() {
            Some(parent) => parent.children.extend(blocks),
            None => output.extend(blocks),
        }
    }

    output
        .into_iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(head: String, children: Vec<Block>, options: &SexpOptions) -> Block {
    if children.iter().all(|child| child.len() == 1) {
        let mut line = head.clone();
        for child in &children {
            line.push(' ');
            line.push_str(&child[0]);
        }
        line.push(')');
        if line.len() < options.wrap {
            return vec![line];
        }
    }

    let indent = " ".repeat(options.indent);
    let mut lines = vec![head];
    for child in children {
        lines.extend(child.into_iter().map(|line| format!("{indent}{line}")));
    }
    if let Some(last) = lines.last_mut() {
        last.push(')');
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::OwnedTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sexp_fits_on_one_line() {
        let tree = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        assert_eq!(
            sexp(tree.walk(), &SexpOptions::default()),
            "(1 (2 (3)) (4 (5)))"
        );
    }

    #[test]
    fn test_sexp_wraps_long_subtrees() {
        let tree = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        let options = SexpOptions {
            wrap: 10,
            ..SexpOptions::default()
        };
        insta::assert_snapshot!(sexp(tree.walk(), &options), @r"
        (1
          (2 (3))
          (4 (5)))
        ");

        let options = SexpOptions {
            wrap: 5,
            ..SexpOptions::default()
        };
        insta::assert_snapshot!(sexp(tree.walk(), &options), @r"
        (1
          (2
            (3))
          (4
            (5)))
        ");
    }

    #[test]
    fn test_sexp_anonymous_nodes() {
        let tree = OwnedTree::from_sexp(r#"(binary (number) "+" (number))"#).unwrap();
        assert_eq!(
            sexp(tree.walk(), &SexpOptions::default()),
            "(binary (number) (number))"
        );

        let options = SexpOptions {
            named_only: false,
            ..SexpOptions::default()
        };
        assert_eq!(sexp(tree.walk(), &options), "(binary (number) (+) (number))");
    }

    #[test]
    fn test_sexp_subtree_at_cursor() {
        let tree = OwnedTree::from_sexp("(1 (2 3) (4 5))").unwrap();
        let four = tree.root().children().nth(1).unwrap();
        assert_eq!(sexp(four.walk(), &SexpOptions::default()), "(4 (5))");
    }

    #[test]
    fn test_sexp_with_custom_labels() {
        let tree = OwnedTree::from_sexp(r#"(binary (number) "+" (number))"#).unwrap();
        let rendered = sexp_with(tree.walk(), &SexpOptions::default(), |node| {
            format!("{}#{}", node.label(), node.index())
        });
        assert_eq!(rendered, "(binary#0 (number#1) (number#3))");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SexpOptions = serde_json::from_str(r#"{"wrap": 10}"#).unwrap();
        assert_eq!(
            options,
            SexpOptions {
                wrap: 10,
                indent: 2,
                named_only: true,
                fields: true,
            }
        );
        let options: SexpOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SexpOptions::default());
    }
}
