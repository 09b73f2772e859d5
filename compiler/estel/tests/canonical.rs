//! End-to-end runs over parser-shaped ESTree JSON.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use estel::{
    create_root_scope, evaluate_values, resolve_names, Engine, Error, EvalErrorKind, SyntaxTree,
    Value,
};
use pretty_assertions::assert_eq;

/// ```js
/// function fn(a, b) {
///   return () => this.someProp + arguments[0] + arguments[1];
/// }
/// var obj = { someProp: 10, fn };
/// var closure = obj.fn(1, 2);
/// var result = closure();
/// ```
const CANONICAL: &str = r#"{
  "type": "Program", "start": 0, "end": 160, "sourceType": "script",
  "body": [
    {
      "type": "FunctionDeclaration", "start": 0, "end": 75,
      "id": { "type": "Identifier", "start": 9, "end": 11, "name": "fn" },
      "expression": false, "generator": false, "async": false,
      "params": [
        { "type": "Identifier", "start": 12, "end": 13, "name": "a" },
        { "type": "Identifier", "start": 15, "end": 16, "name": "b" }
      ],
      "body": {
        "type": "BlockStatement", "start": 18, "end": 75,
        "body": [
          {
            "type": "ReturnStatement", "start": 20, "end": 73,
            "argument": {
              "type": "ArrowFunctionExpression", "start": 27, "end": 72,
              "id": null, "expression": true, "generator": false, "async": false,
              "params": [],
              "body": {
                "type": "BinaryExpression", "start": 33, "end": 72, "operator": "+",
                "left": {
                  "type": "BinaryExpression", "start": 33, "end": 58, "operator": "+",
                  "left": {
                    "type": "MemberExpression", "start": 33, "end": 46,
                    "object": { "type": "ThisExpression", "start": 33, "end": 37 },
                    "property": { "type": "Identifier", "start": 38, "end": 46, "name": "someProp" },
                    "computed": false, "optional": false
                  },
                  "right": {
                    "type": "MemberExpression", "start": 49, "end": 61,
                    "object": { "type": "Identifier", "start": 49, "end": 58, "name": "arguments" },
                    "property": { "type": "Literal", "start": 59, "end": 60, "value": 0, "raw": "0" },
                    "computed": true, "optional": false
                  }
                },
                "right": {
                  "type": "MemberExpression", "start": 64, "end": 76,
                  "object": { "type": "Identifier", "start": 64, "end": 73, "name": "arguments" },
                  "property": { "type": "Literal", "start": 74, "end": 75, "value": 1, "raw": "1" },
                  "computed": true, "optional": false
                }
              }
            }
          }
        ]
      }
    },
    {
      "type": "VariableDeclaration", "start": 76, "end": 108, "kind": "var",
      "declarations": [
        {
          "type": "VariableDeclarator", "start": 80, "end": 107,
          "id": { "type": "Identifier", "start": 80, "end": 83, "name": "obj" },
          "init": {
            "type": "ObjectExpression", "start": 86, "end": 107,
            "properties": [
              {
                "type": "Property", "start": 88, "end": 100,
                "method": false, "shorthand": false, "computed": false, "kind": "init",
                "key": { "type": "Identifier", "start": 88, "end": 96, "name": "someProp" },
                "value": { "type": "Literal", "start": 98, "end": 100, "value": 10, "raw": "10" }
              },
              {
                "type": "Property", "start": 102, "end": 104,
                "method": false, "shorthand": true, "computed": false, "kind": "init",
                "key": { "type": "Identifier", "start": 102, "end": 104, "name": "fn" },
                "value": { "type": "Identifier", "start": 102, "end": 104, "name": "fn" }
              }
            ]
          }
        }
      ]
    },
    {
      "type": "VariableDeclaration", "start": 109, "end": 136, "kind": "var",
      "declarations": [
        {
          "type": "VariableDeclarator", "start": 113, "end": 135,
          "id": { "type": "Identifier", "start": 113, "end": 120, "name": "closure" },
          "init": {
            "type": "CallExpression", "start": 123, "end": 135, "optional": false,
            "callee": {
              "type": "MemberExpression", "start": 123, "end": 129,
              "object": { "type": "Identifier", "start": 123, "end": 126, "name": "obj" },
              "property": { "type": "Identifier", "start": 127, "end": 129, "name": "fn" },
              "computed": false, "optional": false
            },
            "arguments": [
              { "type": "Literal", "start": 130, "end": 131, "value": 1, "raw": "1" },
              { "type": "Literal", "start": 133, "end": 134, "value": 2, "raw": "2" }
            ]
          }
        }
      ]
    },
    {
      "type": "VariableDeclaration", "start": 137, "end": 160, "kind": "var",
      "declarations": [
        {
          "type": "VariableDeclarator", "start": 141, "end": 159,
          "id": { "type": "Identifier", "start": 141, "end": 147, "name": "result" },
          "init": {
            "type": "CallExpression", "start": 150, "end": 159, "optional": false,
            "callee": { "type": "Identifier", "start": 150, "end": 157, "name": "closure" },
            "arguments": []
          }
        }
      ]
    }
  ]
}"#;

/// The same program as written for esprima: block-scoped declarations and
/// a stray `;` after the function body.
///
/// ```js
/// function fn(a, b) {
///   return () => this.someProp + arguments[0] + arguments[1];
/// };
/// let obj = { someProp: 10, fn };
/// let closure = obj.fn(1, 2);
/// let result = closure();
/// ```
const CANONICAL_LET: &str = r#"{
  "type": "Program", "sourceType": "script",
  "body": [
    {
      "type": "FunctionDeclaration",
      "id": { "type": "Identifier", "name": "fn" },
      "params": [
        { "type": "Identifier", "name": "a" },
        { "type": "Identifier", "name": "b" }
      ],
      "body": {
        "type": "BlockStatement",
        "body": [
          {
            "type": "ReturnStatement",
            "argument": {
              "type": "ArrowFunctionExpression", "id": null, "params": [],
              "body": {
                "type": "BinaryExpression", "operator": "+",
                "left": {
                  "type": "BinaryExpression", "operator": "+",
                  "left": {
                    "type": "MemberExpression", "computed": false,
                    "object": { "type": "ThisExpression" },
                    "property": { "type": "Identifier", "name": "someProp" }
                  },
                  "right": {
                    "type": "MemberExpression", "computed": true,
                    "object": { "type": "Identifier", "name": "arguments" },
                    "property": { "type": "Literal", "value": 0, "raw": "0" }
                  }
                },
                "right": {
                  "type": "MemberExpression", "computed": true,
                  "object": { "type": "Identifier", "name": "arguments" },
                  "property": { "type": "Literal", "value": 1, "raw": "1" }
                }
              },
              "generator": false, "expression": true, "async": false
            }
          }
        ]
      },
      "generator": false, "expression": false, "async": false
    },
    { "type": "EmptyStatement" },
    {
      "type": "VariableDeclaration", "kind": "let",
      "declarations": [
        {
          "type": "VariableDeclarator",
          "id": { "type": "Identifier", "name": "obj" },
          "init": {
            "type": "ObjectExpression",
            "properties": [
              {
                "type": "Property", "computed": false, "kind": "init",
                "method": false, "shorthand": false,
                "key": { "type": "Identifier", "name": "someProp" },
                "value": { "type": "Literal", "value": 10, "raw": "10" }
              },
              {
                "type": "Property", "computed": false, "kind": "init",
                "method": false, "shorthand": true,
                "key": { "type": "Identifier", "name": "fn" },
                "value": { "type": "Identifier", "name": "fn" }
              }
            ]
          }
        }
      ]
    },
    {
      "type": "VariableDeclaration", "kind": "let",
      "declarations": [
        {
          "type": "VariableDeclarator",
          "id": { "type": "Identifier", "name": "closure" },
          "init": {
            "type": "CallExpression",
            "callee": {
              "type": "MemberExpression", "computed": false,
              "object": { "type": "Identifier", "name": "obj" },
              "property": { "type": "Identifier", "name": "fn" }
            },
            "arguments": [
              { "type": "Literal", "value": 1, "raw": "1" },
              { "type": "Literal", "value": 2, "raw": "2" }
            ]
          }
        }
      ]
    },
    {
      "type": "VariableDeclaration", "kind": "let",
      "declarations": [
        {
          "type": "VariableDeclarator",
          "id": { "type": "Identifier", "name": "result" },
          "init": {
            "type": "CallExpression",
            "callee": { "type": "Identifier", "name": "closure" },
            "arguments": []
          }
        }
      ]
    }
  ]
}"#;

fn names(scope: &estel::ScopeRef) -> Vec<String> {
    scope.own_names().iter().map(ToString::to_string).collect()
}

#[test]
fn canonical_program_evaluates_to_13() {
    let tree = SyntaxTree::from_estree_json(CANONICAL).unwrap().into_shared();
    let root = create_root_scope();
    let resolved = resolve_names(&tree, &root).unwrap();
    assert_eq!(names(&root), ["fn", "obj", "closure", "result"]);
    assert_eq!(root.get("result"), Some(Value::Undefined));

    let resolved = evaluate_values(resolved).unwrap();
    assert_eq!(root.get("result"), Some(Value::Number(13.0)));
    assert_eq!(names(&resolved.root_scope), ["fn", "obj", "closure", "result"]);
    assert!(matches!(root.get("fn"), Some(Value::Closure(_))));
}

#[test]
fn block_scoped_program_binds_at_the_root() {
    let tree = SyntaxTree::from_estree_json(CANONICAL_LET).unwrap().into_shared();
    let root = create_root_scope();
    let resolved = resolve_names(&tree, &root).unwrap();
    assert_eq!(names(&root), ["fn", "obj", "closure", "result"]);
    assert_eq!(root.get("closure"), Some(Value::Undefined));

    evaluate_values(resolved).unwrap();
    assert_eq!(root.get("result"), Some(Value::Number(13.0)));
    assert_eq!(root.get_own("obj").as_ref().map(Value::type_name), Some("object"));
}

#[test]
fn call_scope_lives_while_its_closure_is_reachable() {
    let resolved = Engine::new().run_json(CANONICAL).unwrap();
    let root = resolved.root_scope.clone();

    // The `obj.fn(1, 2)` call-scope is kept alive by the arrow in `closure`.
    let live = root.children();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].get_own("arguments").as_ref().map(Value::to_js_string), Some("1,2".into()));
    assert!(live[0].is_dynamic_context_owner());
    drop(live);

    root.set("closure", Value::Undefined);
    assert!(root.children().is_empty());
}

#[test]
fn scope_queries_after_evaluation() {
    let resolved = Engine::new().run_json(CANONICAL).unwrap();
    let root = resolved.root_scope;
    assert!(root.has("obj"));
    assert_eq!(root.get("missing"), None);
    assert_eq!(root.all_names().len(), 4);
}

#[test]
fn invalid_json_is_an_import_error() {
    let err = Engine::new().run_json("{ not json").unwrap_err();
    assert!(matches!(err, Error::Import(_)));

    let err = Engine::new().run_json(r#"{ "body": [] }"#).unwrap_err();
    assert!(matches!(err, Error::Import(_)));
}

#[test]
fn evaluation_errors_surface_through_run() {
    let program = r#"{
      "type": "Program", "sourceType": "script",
      "body": [
        { "type": "LabeledStatement",
          "label": { "type": "Identifier", "name": "outer" },
          "body": { "type": "EmptyStatement" } }
      ]
    }"#;
    let err = Engine::new().run_json(program).unwrap_err();
    let Error::Eval(err) = err else {
        panic!("expected an evaluation error, got {err:?}");
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::UnsupportedNode {
            tag: "LabeledStatement".into()
        }
    );
}
