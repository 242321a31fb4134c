/*
 * tree_sitter_json.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Traversals over real tree-sitter trees, checked against tree-sitter's own
 * node API.
 */

use pretty_assertions::assert_eq;
use tree_sitter::{Node, Parser, Tree};
use ts_utils::predicates::{always, named_only};
use ts_utils::{
    iternodes, iternodes_with_edges, iternodes_with_parent, sexp, sexp_with, walk_tree,
    AdjacencyMatrices, Cursor, EventKind, NodeCollection, SexpOptions,
};

const SOURCE: &str = r#"{"name": "ts-utils", "tags": [1, true, null], "nested": {"a": []}}"#;

fn parse(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_json::LANGUAGE.into())
        .expect("Error loading JSON grammar");
    parser.parse(source, None).expect("Failed to parse")
}

fn preorder<'t>(node: Node<'t>, keep: &impl Fn(&Node<'t>) -> bool, out: &mut Vec<Node<'t>>) {
    if !keep(&node) {
        return;
    }
    out.push(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        preorder(child, keep, out);
    }
}

#[test]
fn test_iternodes_matches_node_api() {
    let tree = parse(SOURCE);

    let mut expected = Vec::new();
    preorder(tree.root_node(), &|_| true, &mut expected);
    let actual: Vec<_> = iternodes(tree.walk(), always).collect();
    assert_eq!(actual, expected);

    let mut expected = Vec::new();
    preorder(tree.root_node(), &|n| n.is_named(), &mut expected);
    let actual: Vec<_> = iternodes(tree.walk(), named_only).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_named_kinds() {
    let tree = parse(r#"{"a": [1, null]}"#);
    let kinds: Vec<&str> = iternodes(tree.walk(), named_only)
        .map(|n| n.kind())
        .collect();
    assert_eq!(kinds[..3], ["document", "object", "pair"]);
    assert!(kinds.contains(&"array"));
    assert!(kinds.contains(&"number"));
    assert!(kinds.contains(&"null"));
}

#[test]
fn test_walk_returns_cursor_to_start() {
    let tree = parse(SOURCE);
    let mut cursor = tree.walk();
    let events = walk_tree(&mut cursor).count();
    assert_eq!(cursor.node(), tree.root_node());
    assert_eq!(events % 2, 0);

    // a cursor moved into the tree only walks the subtree below it
    assert!(cursor.goto_first_child());
    let object = cursor.node();
    let mut expected = Vec::new();
    preorder(object, &|_| true, &mut expected);
    let actual: Vec<_> = iternodes(&mut cursor, always).collect();
    assert_eq!(actual, expected);
    assert_eq!(cursor.current(), object);
}

#[test]
fn test_parents_match_node_api() {
    let tree = parse(SOURCE);
    for (node, parent) in iternodes_with_parent(tree.walk(), named_only) {
        assert_eq!(parent, node.parent());
    }
}

#[test]
fn test_adjacency_over_named_nodes() {
    let tree = parse(SOURCE);
    let named = iternodes(tree.walk(), named_only).count();
    let matrices = AdjacencyMatrices::build(tree.walk(), named_only);

    assert_eq!(matrices.node_count(), named);
    assert_eq!(matrices.parent_to_child().nnz(), named - 1);

    let ids: NodeCollection<_> = iternodes(tree.walk(), always).collect();
    let by_id = AdjacencyMatrices::build_with_ids(tree.walk(), named_only, &ids).unwrap();
    assert_eq!(by_id.node_count(), ids.len());
    assert_eq!(by_id.parent_to_child().nnz(), named - 1);
    let document = ids.id_of(&tree.root_node()).unwrap();
    let object = ids.id_of(&tree.root_node().child(0).unwrap()).unwrap();
    assert!(by_id.parent_to_child().contains(document, object));
}

#[test]
fn test_sexp_of_json() {
    let tree = parse(r#"[1, null]"#);
    assert_eq!(
        sexp(tree.walk(), &SexpOptions::default()),
        "(document (array (number) (null)))"
    );
}

#[test]
fn test_empty_document_yields_root_pair() {
    let tree = parse("");
    let events: Vec<(&str, EventKind)> = walk_tree(tree.walk())
        .map(|e| (e.node.kind(), e.kind))
        .collect();
    assert_eq!(
        events,
        vec![("document", EventKind::EnterFirst), ("document", EventKind::Exit)]
    );
}

#[test]
fn test_edges_report_field_names() {
    let tree = parse(r#"{"a": 1}"#);
    let edges: Vec<(&str, Option<&str>, Option<&str>)> =
        iternodes_with_edges(tree.walk(), named_only)
            .map(|(node, parent, field)| (node.kind(), parent.map(|p| p.kind()), field))
            .collect();
    assert_eq!(
        edges,
        vec![
            ("document", None, None),
            ("object", Some("document"), None),
            ("pair", Some("object"), None),
            ("string", Some("pair"), Some("key")),
            ("string_content", Some("string"), None),
            ("number", Some("pair"), Some("value")),
        ]
    );
}

#[test]
fn test_edges_agree_with_iternodes() {
    let tree = parse(SOURCE);
    let plain: Vec<_> = iternodes(tree.walk(), always).collect();
    let with_edges: Vec<_> = iternodes_with_edges(tree.walk(), always)
        .map(|(node, _, _)| node)
        .collect();
    assert_eq!(plain, with_edges);

    for (node, parent, _) in iternodes_with_edges(tree.walk(), always) {
        assert_eq!(parent, node.parent());
    }
}

#[test]
fn test_sexp_prints_field_prefixes() {
    let tree = parse(r#"{"a": 1}"#);
    let object = tree.root_node().child(0).unwrap();
    let pair = object.named_child(0).unwrap();
    let options = SexpOptions {
        wrap: 100,
        ..SexpOptions::default()
    };
    assert_eq!(
        sexp(pair.walk(), &options),
        "(pair key: (string (string_content)) value: (number))"
    );

    let options = SexpOptions {
        fields: false,
        ..options
    };
    assert_eq!(
        sexp(pair.walk(), &options),
        "(pair (string (string_content)) (number))"
    );

    let rendered = sexp_with(tree.walk(), &SexpOptions::default(), |node| {
        node.kind().to_uppercase()
    });
    insta::assert_snapshot!(rendered, @r"
    (DOCUMENT
      (OBJECT
        (PAIR
          key: (STRING (STRING_CONTENT))
          value: (NUMBER))))
    ");
}
