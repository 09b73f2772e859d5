use super::*;
use pretty_assertions::assert_eq;

const LET_X: &str = r#"{
    "type": "Program",
    "sourceType": "script",
    "range": [0, 10],
    "body": [{
        "type": "VariableDeclaration",
        "kind": "let",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": { "type": "Identifier", "name": "x" },
            "init": { "type": "Literal", "value": 10, "raw": "10" }
        }]
    }]
}"#;

#[test]
fn test_imports_nodes_and_scalars() {
    let tree = SyntaxTree::from_estree_json(LET_X).unwrap();
    let program = tree.root();
    assert!(tree.is(program, "Program"));
    assert_eq!(tree.str_prop(program, "sourceType").unwrap(), "script");
    assert!(tree.prop(program, "range").is_none());

    let decl = tree.children(program, "body")[0].unwrap();
    assert_eq!(tree.str_prop(decl, "kind").unwrap(), "let");
    let declarator = tree.children(decl, "declarations")[0].unwrap();
    let id = tree.child(declarator, "id").unwrap();
    assert_eq!(tree.identifier_name(id).unwrap(), "x");
    let init = tree.child(declarator, "init").unwrap();
    assert_eq!(tree.num_prop(init, "value"), Some(10.0));
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_flattens_plain_objects() {
    let tree = SyntaxTree::from_estree_json(
        r#"{ "type": "TemplateElement", "value": { "raw": "a\\n", "cooked": "a\n" }, "tail": true }"#,
    )
    .unwrap();
    let root = tree.root();
    assert_eq!(tree.str_prop(root, "value.cooked").unwrap(), "a\n");
    assert_eq!(tree.str_prop(root, "value.raw").unwrap(), "a\\n");
    assert!(tree.flag(root, "tail"));
}

#[test]
fn test_array_holes_and_nulls() {
    let tree = SyntaxTree::from_estree_json(
        r#"{ "type": "ArrayExpression", "elements": [null, { "type": "Identifier", "name": "a" }] }"#,
    )
    .unwrap();
    let elements = tree.children(tree.root(), "elements");
    assert_eq!(elements.len(), 2);
    assert!(elements[0].is_none());
    assert!(elements[1].is_some());
}

#[test]
fn test_rejects_non_node_root() {
    let err = SyntaxTree::from_estree_json("[1, 2]").unwrap_err();
    assert!(matches!(err, ImportError::NotANode { .. }));
}

#[test]
fn test_rejects_missing_type() {
    let err = SyntaxTree::from_estree_json(r#"{ "name": "x" }"#).unwrap_err();
    assert!(matches!(err, ImportError::MissingType { .. }));
}

#[test]
fn test_rejects_scalar_list_elements() {
    let err =
        SyntaxTree::from_estree_json(r#"{ "type": "ArrayExpression", "elements": [1] }"#)
            .unwrap_err();
    match err {
        ImportError::UnsupportedListElement { path } => assert_eq!(path, "$.elements[0]"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reports_invalid_json() {
    let err = SyntaxTree::from_estree_json("{").unwrap_err();
    assert!(matches!(err, ImportError::Json(_)));
    assert!(err.to_string().starts_with("invalid ESTree JSON"));
}
