//! Node tags and the predicates hoisting is defined in terms of.

pub const PROGRAM: &str = "Program";
pub const IDENTIFIER: &str = "Identifier";
pub const LITERAL: &str = "Literal";
pub const BLOCK_STATEMENT: &str = "BlockStatement";
pub const EXPRESSION_STATEMENT: &str = "ExpressionStatement";
pub const VARIABLE_DECLARATION: &str = "VariableDeclaration";
pub const VARIABLE_DECLARATOR: &str = "VariableDeclarator";
pub const FUNCTION_DECLARATION: &str = "FunctionDeclaration";
pub const FUNCTION_EXPRESSION: &str = "FunctionExpression";
pub const ARROW_FUNCTION_EXPRESSION: &str = "ArrowFunctionExpression";
pub const CLASS_DECLARATION: &str = "ClassDeclaration";
pub const CLASS_EXPRESSION: &str = "ClassExpression";
pub const CLASS_BODY: &str = "ClassBody";
pub const CATCH_CLAUSE: &str = "CatchClause";
pub const FOR_STATEMENT: &str = "ForStatement";
pub const SWITCH_STATEMENT: &str = "SwitchStatement";
pub const IMPORT_SPECIFIER: &str = "ImportSpecifier";
pub const IMPORT_DEFAULT_SPECIFIER: &str = "ImportDefaultSpecifier";
pub const IMPORT_NAMESPACE_SPECIFIER: &str = "ImportNamespaceSpecifier";
pub const MEMBER_EXPRESSION: &str = "MemberExpression";
pub const OBJECT_PATTERN: &str = "ObjectPattern";
pub const ARRAY_PATTERN: &str = "ArrayPattern";
pub const ASSIGNMENT_PATTERN: &str = "AssignmentPattern";
pub const REST_ELEMENT: &str = "RestElement";
pub const SPREAD_ELEMENT: &str = "SpreadElement";
pub const PROPERTY: &str = "Property";

/// Function-like nodes: the boundary for `var` and function hoisting.
#[inline]
pub fn is_function_tag(tag: &str) -> bool {
    matches!(
        tag,
        FUNCTION_DECLARATION | FUNCTION_EXPRESSION | ARROW_FUNCTION_EXPRESSION
    )
}

/// Class nodes: also a boundary for `var` hoisting.
#[inline]
pub fn is_class_tag(tag: &str) -> bool {
    matches!(tag, CLASS_DECLARATION | CLASS_EXPRESSION)
}

/// Block-like nodes: each opens its own lexical scope.
#[inline]
pub fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        BLOCK_STATEMENT | FOR_STATEMENT | SWITCH_STATEMENT | CLASS_BODY
    )
}

/// Child traversal order for known ESTree node types.
///
/// Mirrors the `estraverse` visitor keys so handlers observe the same order
/// a JavaScript tool would. Unknown tags return `None`.
pub fn visitor_keys(tag: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match tag {
        "AssignmentExpression" | "AssignmentPattern" | "BinaryExpression"
        | "LogicalExpression" => &["left", "right"],
        "ArrayExpression" | "ArrayPattern" => &["elements"],
        "ArrowFunctionExpression" => &["params", "body"],
        "AwaitExpression" | "ReturnStatement" | "SpreadElement" | "RestElement"
        | "ThrowStatement" | "UnaryExpression" | "UpdateExpression" | "YieldExpression" => {
            &["argument"]
        }
        "BlockStatement" | "ClassBody" | "Program" => &["body"],
        "BreakStatement" | "ContinueStatement" => &["label"],
        "CallExpression" | "NewExpression" => &["callee", "arguments"],
        "CatchClause" => &["param", "body"],
        "ClassDeclaration" | "ClassExpression" => &["id", "superClass", "body"],
        "ConditionalExpression" | "IfStatement" => &["test", "consequent", "alternate"],
        "DebuggerStatement" | "EmptyStatement" | "Identifier" | "Literal" | "Super"
        | "TemplateElement" | "ThisExpression" => &[],
        "DoWhileStatement" => &["body", "test"],
        "ExpressionStatement" => &["expression"],
        "ForStatement" => &["init", "test", "update", "body"],
        "ForInStatement" | "ForOfStatement" => &["left", "right", "body"],
        "FunctionDeclaration" | "FunctionExpression" => &["id", "params", "body"],
        "ImportDeclaration" => &["specifiers", "source"],
        "ImportDefaultSpecifier" | "ImportNamespaceSpecifier" => &["local"],
        "ImportSpecifier" => &["imported", "local"],
        "LabeledStatement" => &["label", "body"],
        "MemberExpression" => &["object", "property"],
        "MethodDefinition" | "Property" => &["key", "value"],
        "ObjectExpression" | "ObjectPattern" => &["properties"],
        "SequenceExpression" => &["expressions"],
        "SwitchStatement" => &["discriminant", "cases"],
        "SwitchCase" => &["test", "consequent"],
        "TemplateLiteral" => &["quasis", "expressions"],
        "TryStatement" => &["block", "handler", "finalizer"],
        "VariableDeclaration" => &["declarations"],
        "VariableDeclarator" => &["id", "init"],
        "WhileStatement" => &["test", "body"],
        _ => return None,
    };
    Some(keys)
}
