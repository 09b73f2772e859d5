use super::*;
use crate::{LiteralValue, TreeBuilder};
use pretty_assertions::assert_eq;

fn var_decl_tree() -> SyntaxTree {
    // var x = 1;
    let mut b = TreeBuilder::new();
    let id = b.create_identifier("x");
    let init = b.create_literal(1).unwrap();
    let declarator = b.add(
        "VariableDeclarator",
        [("id", Prop::Node(id)), ("init", Prop::Node(init))],
    );
    let declaration = b.add(
        "VariableDeclaration",
        [
            ("declarations", Prop::List(vec![Some(declarator)])),
            ("kind", Prop::Str(Name::new("var"))),
        ],
    );
    let program = b.add("Program", [("body", Prop::List(vec![Some(declaration)]))]);
    b.finish(program)
}

#[test]
fn test_accessors() {
    let tree = var_decl_tree();
    let program = tree.root();
    assert!(tree.is(program, "Program"));

    let declaration = tree.children(program, "body")[0].unwrap();
    assert_eq!(tree.str_prop(declaration, "kind").unwrap(), "var");

    let declarator = tree.children(declaration, "declarations")[0].unwrap();
    let id = tree.child(declarator, "id").unwrap();
    assert_eq!(tree.identifier_name(id).unwrap(), "x");

    let init = tree.child(declarator, "init").unwrap();
    assert_eq!(tree.num_prop(init, "value"), Some(1.0));
    assert_eq!(tree.identifier_name(init), None);
}

#[test]
fn test_missing_props_read_as_empty() {
    let tree = var_decl_tree();
    let program = tree.root();
    assert_eq!(tree.child(program, "nope"), None);
    assert!(tree.children(program, "nope").is_empty());
    assert!(!tree.flag(program, "computed"));
}

#[test]
fn test_child_nodes_follow_visitor_keys() {
    // Properties declared init-first still visit `id` before `init`.
    let mut b = TreeBuilder::new();
    let init = b.create_literal("v").unwrap();
    let id = b.create_identifier("x");
    let declarator = b.add(
        "VariableDeclarator",
        [("init", Prop::Node(init)), ("id", Prop::Node(id))],
    );
    let tree = b.finish(declarator);
    assert_eq!(tree.child_nodes(declarator).as_slice(), &[id, init]);
}

#[test]
fn test_child_nodes_for_unknown_tags_use_declared_order() {
    let mut b = TreeBuilder::new();
    let a = b.create_identifier("a");
    let c = b.create_identifier("c");
    let d = b.create_identifier("d");
    let node = b.add(
        "PipelineExpression",
        [
            ("head", Prop::Node(a)),
            ("operator", Prop::Str(Name::new("|>"))),
            ("stages", Prop::List(vec![Some(c), None, Some(d)])),
        ],
    );
    let tree = b.finish(node);
    assert_eq!(tree.child_nodes(node).as_slice(), &[a, c, d]);
}

#[test]
fn test_first_expression_unwraps_expression_statement() {
    let mut b = TreeBuilder::new();
    let x = b.create_identifier("x");
    let stmt = b.add("ExpressionStatement", [("expression", Prop::Node(x))]);
    let block = b.add("BlockStatement", [("body", Prop::List(vec![Some(stmt)]))]);
    let empty = b.add("BlockStatement", [("body", Prop::List(vec![]))]);
    let program = b.add(
        "Program",
        [("body", Prop::List(vec![Some(block), Some(empty)]))],
    );
    let tree = b.finish(program);

    assert_eq!(tree.first_expression(block), Some(x));
    assert_eq!(tree.first_expression(program), Some(block));
    assert_eq!(tree.first_expression(empty), None);
    assert_eq!(tree.first_expression(x), None);
}

#[test]
fn test_create_literal_rejects_non_finite_numbers() {
    let mut b = TreeBuilder::new();
    assert!(b.create_literal(f64::NAN).is_none());
    assert!(b.create_literal(f64::INFINITY).is_none());
    assert!(b.is_empty());

    let s = b.create_literal(LiteralValue::from("hi")).unwrap();
    let t = b.create_literal(true).unwrap();
    let tree = b.finish(s);
    assert_eq!(tree.str_prop(s, "raw").unwrap(), "\"hi\"");
    assert_eq!(tree.str_prop(t, "raw").unwrap(), "true");
}

#[test]
fn test_shared_tree_identity() {
    let shared = var_decl_tree().into_shared();
    let other = shared.clone();
    assert!(shared.ptr_eq(&other));
    assert!(!shared.ptr_eq(&var_decl_tree().into_shared()));
    assert_eq!(other.len(), shared.len());
}
