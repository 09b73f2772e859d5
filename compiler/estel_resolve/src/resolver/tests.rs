use super::*;
use estel_ir::SyntaxTree;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

fn id(name: &str) -> Json {
    json!({ "type": "Identifier", "name": name })
}

fn num(n: f64) -> Json {
    json!({ "type": "Literal", "value": n })
}

fn decl(kind: &str, target: Json, init: Json) -> Json {
    json!({
        "type": "VariableDeclaration",
        "kind": kind,
        "declarations": [{ "type": "VariableDeclarator", "id": target, "init": init }]
    })
}

fn block(body: Vec<Json>) -> Json {
    json!({ "type": "BlockStatement", "body": body })
}

fn program(body: Vec<Json>) -> SharedTree {
    let json = json!({ "type": "Program", "sourceType": "script", "body": body });
    SyntaxTree::from_estree_value(&json).unwrap().into_shared()
}

fn names(scope: &ScopeRef) -> Vec<String> {
    scope.own_names().iter().map(ToString::to_string).collect()
}

/// Depth-first search for the first node with `tag`.
fn find(tree: &SyntaxTree, tag: &str) -> NodeId {
    fn go(tree: &SyntaxTree, node: NodeId, tag: &str) -> Option<NodeId> {
        if tree.is(node, tag) {
            return Some(node);
        }
        tree.child_nodes(node)
            .into_iter()
            .find_map(|child| go(tree, child, tag))
    }
    go(tree, tree.root(), tag).unwrap()
}

#[test]
fn var_in_block_hoists_to_root_let_stays_in_block() {
    // var a = 1; { var b; let c; }
    let tree = program(vec![
        decl("var", id("a"), num(1.0)),
        block(vec![
            decl("var", id("b"), Json::Null),
            decl("let", id("c"), Json::Null),
        ]),
    ]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    assert_eq!(names(&root), vec!["a", "b"]);
    assert_eq!(root.get_own("a"), Some(estel_runtime::Value::Undefined));

    let inner = resolved.links.scope(find(&tree, "BlockStatement")).unwrap();
    assert!(inner.parent().unwrap().ptr_eq(&root));
    assert_eq!(names(inner), vec!["c"]);
}

#[test]
fn function_declaration_is_hoisted_and_body_skipped() {
    // { function f(x) { var inner; } }
    let func = json!({
        "type": "FunctionDeclaration",
        "id": id("f"),
        "params": [id("x")],
        "body": block(vec![decl("var", id("inner"), Json::Null)])
    });
    let tree = program(vec![block(vec![func])]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    assert_eq!(names(&root), vec!["f"]);
    let f = find(&tree, "FunctionDeclaration");
    assert!(resolved.links.target(f).unwrap().ptr_eq(&root));

    // The body was not visited, so nothing in it has links.
    let body = tree.child(f, "body").unwrap();
    assert!(!resolved.links.contains(body));
    assert!(!root.has("inner"));
}

#[test]
fn for_let_is_scoped_to_the_loop() {
    // for (let i = 0;;) {}
    let for_stmt = json!({
        "type": "ForStatement",
        "init": decl("let", id("i"), num(0.0)),
        "test": null,
        "update": null,
        "body": block(vec![])
    });
    let tree = program(vec![for_stmt]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    let loop_scope = resolved.links.scope(find(&tree, "ForStatement")).unwrap();
    assert_eq!(names(loop_scope), vec!["i"]);
    assert!(root.own_names().is_empty());

    let body_scope = resolved.links.scope(find(&tree, "BlockStatement")).unwrap();
    assert!(body_scope.parent().unwrap().ptr_eq(loop_scope));
}

#[test]
fn catch_parameter_is_declared_in_catch_body() {
    // try {} catch ({ message }) {}
    let try_stmt = json!({
        "type": "TryStatement",
        "block": block(vec![]),
        "handler": {
            "type": "CatchClause",
            "param": {
                "type": "ObjectPattern",
                "properties": [{
                    "type": "Property", "key": id("message"), "value": id("message"),
                    "kind": "init", "computed": false, "shorthand": true, "method": false
                }]
            },
            "body": block(vec![])
        },
        "finalizer": null
    });
    let tree = program(vec![try_stmt]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    let clause = find(&tree, "CatchClause");
    let body = tree.child(clause, "body").unwrap();
    assert_eq!(names(resolved.links.scope(body).unwrap()), vec!["message"]);
    let try_block = tree.child(find(&tree, "TryStatement"), "block").unwrap();
    assert!(names(resolved.links.scope(try_block).unwrap()).is_empty());
}

#[test]
fn destructuring_declares_every_bound_name() {
    // const [d, { e, g: h }, k = 1, ...rest] = arr;
    let pattern = json!({
        "type": "ArrayPattern",
        "elements": [
            id("d"),
            {
                "type": "ObjectPattern",
                "properties": [
                    { "type": "Property", "key": id("e"), "value": id("e"), "shorthand": true },
                    { "type": "Property", "key": id("g"), "value": id("h"), "shorthand": false }
                ]
            },
            { "type": "AssignmentPattern", "left": id("k"), "right": num(1.0) },
            { "type": "RestElement", "argument": id("rest") }
        ]
    });
    let tree = program(vec![decl("const", pattern, id("arr"))]);
    let root = ScopeRef::root();
    NameResolver::new().resolve(&tree, &root).unwrap();
    assert_eq!(names(&root), vec!["d", "e", "h", "k", "rest"]);
}

#[test]
fn classes_and_imports() {
    let class_decl = json!({
        "type": "ClassDeclaration",
        "id": id("A"),
        "superClass": null,
        "body": { "type": "ClassBody", "body": [] }
    });
    let class_expr = decl(
        "let",
        id("b"),
        json!({
            "type": "ClassExpression",
            "id": id("B"),
            "superClass": null,
            "body": { "type": "ClassBody", "body": [] }
        }),
    );
    let import = json!({
        "type": "ImportDeclaration",
        "specifiers": [
            { "type": "ImportDefaultSpecifier", "local": id("def") },
            { "type": "ImportSpecifier", "imported": id("x"), "local": id("y") },
            { "type": "ImportNamespaceSpecifier", "local": id("ns") }
        ],
        "source": { "type": "Literal", "value": "mod" }
    });
    let tree = program(vec![class_decl, class_expr, import]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    assert_eq!(names(&root), vec!["A", "b", "def", "y", "ns"]);

    let expr = find(&tree, "ClassExpression");
    let body = tree.child(expr, "body").unwrap();
    assert_eq!(names(resolved.links.scope(body).unwrap()), vec!["B"]);
}

#[test]
fn root_scope_already_bound_is_rejected() {
    let tree = program(vec![]);
    let root = ScopeRef::root();
    root.set_owner(Some(NodeId::new(7)));
    let err = NameResolver::new().resolve(&tree, &root).unwrap_err();
    assert_eq!(
        err,
        StructuralError::RootScopeAlreadyBound {
            owner: NodeId::new(7)
        }
    );
}

#[test]
fn resolving_twice_with_the_same_root_is_rejected() {
    let tree = program(vec![decl("var", id("a"), Json::Null)]);
    let root = ScopeRef::root();
    let resolver = NameResolver::new();
    resolver.resolve(&tree, &root).unwrap();
    assert!(resolver.resolve(&tree, &root).is_err());
}

#[test]
fn activation_stops_bubbling_at_the_body() {
    // function f() { var v; { var w; let x; } }
    let body = block(vec![
        decl("var", id("v"), Json::Null),
        block(vec![
            decl("var", id("w"), Json::Null),
            decl("let", id("x"), Json::Null),
        ]),
    ]);
    let func = json!({ "type": "FunctionDeclaration", "id": id("f"), "params": [], "body": body });
    let tree = program(vec![func]);
    let root = ScopeRef::root();
    let resolver = NameResolver::new();
    resolver.resolve(&tree, &root).unwrap();

    let f = find(&tree, "FunctionDeclaration");
    let body = tree.child(f, "body").unwrap();
    let call_scope = root.new_child();
    let links = resolver.resolve_activation(&tree, body, &call_scope);

    assert_eq!(call_scope.owner(), Some(body));
    assert_eq!(names(&call_scope), vec!["v", "w"]);
    assert_eq!(names(&root), vec!["f"]);

    let inner = tree.children(body, "body")[1].unwrap();
    let inner_scope = links.scope(inner).unwrap();
    assert_eq!(names(inner_scope), vec!["x"]);
    assert!(inner_scope.parent().unwrap().ptr_eq(&call_scope));
}

#[test]
fn declarations_keep_existing_cells() {
    let tree = program(vec![decl("var", id("a"), Json::Null)]);
    let root = ScopeRef::root();
    root.declare_own("a", Some(estel_runtime::Value::Number(3.0)));
    NameResolver::new().resolve(&tree, &root).unwrap();
    assert_eq!(root.get_own("a"), Some(estel_runtime::Value::Number(3.0)));
}

fn mark_statements(
    _: &SyntaxTree,
    node: NodeId,
    _: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let scope = cx.scope_of(node);
    cx.declare(node, &scope, Some(Name::new("__stmt")));
    WalkAction::Skip
}

#[test]
fn host_handlers_extend_and_override() {
    // var a; { x; var b; }
    let stmt = json!({ "type": "ExpressionStatement", "expression": id("x") });
    let tree = program(vec![
        decl("var", id("a"), Json::Null),
        block(vec![stmt, decl("var", id("b"), Json::Null)]),
    ]);
    let root = ScopeRef::root();
    let resolver = NameResolver::new()
        .with_handler("ExpressionStatement", mark_statements)
        .with_handler(kinds::VARIABLE_DECLARATOR, skip_body);
    let resolved = resolver.resolve(&tree, &root).unwrap();

    assert!(root.own_names().is_empty());
    let inner = resolved.links.scope(find(&tree, "BlockStatement")).unwrap();
    assert_eq!(names(inner), vec!["__stmt"]);
}

#[test]
fn every_visited_node_has_a_parent_link() {
    let tree = program(vec![block(vec![decl("let", id("a"), num(1.0))])]);
    let root = ScopeRef::root();
    let resolved = NameResolver::new().resolve(&tree, &root).unwrap();

    let literal = find(&tree, "Literal");
    let declarator = resolved.links.parent(literal).unwrap();
    assert!(tree.is(declarator, "VariableDeclarator"));
    assert_eq!(resolved.links.parent(tree.root()), None);
    assert_eq!(resolved.links.len(), tree.len());
}
