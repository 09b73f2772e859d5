//! Expression resolvers.

use estel_ir::{kinds, Name, NodeId, Prop, SyntaxTree};
use estel_runtime::{
    malformed_node, unsupported_node, ClosureValue, ControlAction, EvalError, EvalResult, Fields,
    Local, ScopeRef, Value,
};

use super::member::{delete_property, enumerable_keys, get_property, iterate_values};
use super::pattern::{Binding, Place};
use crate::interpreter::Interpreter;
use crate::operators::evaluate_binary;
use crate::unary_operators::{evaluate_unary, step};

/// The `operator` of a unary, binary, logical, update or assignment node.
fn operator<'t>(tree: &'t SyntaxTree, node: NodeId) -> Result<&'t str, EvalError> {
    tree.str_prop(node, "operator")
        .map(Name::as_str)
        .ok_or_else(|| malformed_node(tree.tag(node), "missing `operator`"))
}

/// A function or arrow expression without an `id` of its own.
fn is_anonymous_function(tree: &SyntaxTree, node: NodeId) -> bool {
    (tree.is(node, kinds::FUNCTION_EXPRESSION) || tree.is(node, kinds::ARROW_FUNCTION_EXPRESSION))
        && tree.child(node, "id").is_none()
}

/// Evaluate `node`, naming the result after `name` when it is a freshly
/// created anonymous closure (`const f = () => {}` gives `f.name == "f"`).
pub(crate) fn eval_named(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
    name: Option<&Name>,
) -> EvalResult {
    let value = interp.eval(node, scope)?;
    if let (Some(name), Value::Closure(closure)) = (name, &value) {
        if closure.name.is_none() && is_anonymous_function(interp.tree(), node) {
            return Ok(Value::closure(ClosureValue {
                name: Some(name.clone()),
                ..(**closure).clone()
            }));
        }
    }
    Ok(value)
}

pub fn identifier(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let name = interp
        .tree()
        .identifier_name(node)
        .ok_or_else(|| malformed_node(kinds::IDENTIFIER, "missing `name`"))?;
    Ok(scope.get(name).unwrap_or_default())
}

pub fn literal(interp: &mut Interpreter<'_>, node: NodeId, _: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    if tree.prop(node, "regex.pattern").is_some() {
        return Err(unsupported_node("RegExpLiteral").into());
    }
    if tree.prop(node, "bigint").is_some() {
        return Err(unsupported_node("BigIntLiteral").into());
    }
    match tree.prop(node, "value") {
        Some(Prop::Str(s)) => Ok(Value::string(s.as_str())),
        Some(Prop::Num(n)) => Ok(Value::Number(*n)),
        Some(Prop::Bool(b)) => Ok(Value::Bool(*b)),
        Some(Prop::Null) => Ok(Value::Null),
        Some(Prop::Node(_) | Prop::List(_)) | None => {
            Err(malformed_node(kinds::LITERAL, "missing scalar `value`").into())
        }
    }
}

/// `this`: the receiver held by the nearest dynamic-context owner.
pub fn this_expression(_: &mut Interpreter<'_>, _: NodeId, scope: &ScopeRef) -> EvalResult {
    Ok(scope
        .nearest_dynamic_context()
        .and_then(|context| context.get_own("this"))
        .unwrap_or_default())
}

pub fn template_literal(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let expressions = tree.children(node, "expressions");
    let mut out = String::new();
    for (index, quasi) in tree.children(node, "quasis").iter().enumerate() {
        if let Some(quasi) = *quasi {
            let text = tree
                .str_prop(quasi, "value.cooked")
                .or_else(|| tree.str_prop(quasi, "value.raw"));
            if let Some(text) = text {
                out.push_str(text);
            }
        }
        if let Some(&Some(expression)) = expressions.get(index) {
            out.push_str(&interp.eval(expression, scope)?.to_js_string());
        }
    }
    Ok(Value::string(out))
}

pub fn array_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let mut items = Vec::new();
    for element in tree.children(node, "elements") {
        match *element {
            None => items.push(Value::Undefined),
            Some(element) if tree.is(element, kinds::SPREAD_ELEMENT) => {
                let argument = interp.required_child(element, "argument")?;
                let spread = interp.eval(argument, scope)?;
                items.extend(iterate_values(&spread)?);
            }
            Some(element) => items.push(interp.eval(element, scope)?),
        }
    }
    Ok(Value::array(items))
}

/// Object literals: plain, shorthand, computed and method properties, and
/// spread. Fields keep their written order.
pub fn object_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let mut fields = Fields::default();
    for &property in tree.children(node, "properties").iter().flatten() {
        if tree.is(property, kinds::SPREAD_ELEMENT) {
            let argument = interp.required_child(property, "argument")?;
            let source = interp.eval(argument, scope)?;
            for key in enumerable_keys(&source) {
                let value = get_property(&source, &key)?;
                fields.insert(key, value);
            }
            continue;
        }
        if !tree.is(property, kinds::PROPERTY) {
            return Err(unsupported_node(tree.tag(property)).at(property).into());
        }
        if let Some(kind @ ("get" | "set")) = tree.str_prop(property, "kind").map(Name::as_str) {
            return Err(unsupported_node(&format!("Property ({kind} accessor)"))
                .at(property)
                .into());
        }
        let key = interp.property_key(property, "key", scope)?;
        let value_node = interp.required_child(property, "value")?;
        let value = eval_named(interp, value_node, scope, Some(&key))?;
        fields.insert(key, value);
    }
    Ok(Value::Object(Local::new(fields)))
}

/// Function and arrow expressions evaluate to closures over `scope`.
pub fn function_expression(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    Ok(interp.create_closure(node, scope, None)?)
}

pub fn member_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let object = interp.required_child(node, "object")?;
    let base = interp.eval(object, scope)?;
    if base.is_nullish() && interp.tree().flag(node, "optional") {
        return Ok(Value::Undefined);
    }
    let key = interp.property_key(node, "property", scope)?;
    Ok(get_property(&base, &key)?)
}

/// `a?.b` and `f?.()`: the optional links short-circuit themselves.
pub fn chain_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let expression = interp.required_child(node, "expression")?;
    interp.eval(expression, scope)
}

/// Calls. A member callee supplies the receiver (`this`); any other callee
/// is called with `this` undefined.
pub fn call_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let callee = interp.required_child(node, "callee")?;
    let (function, this) = if tree.is(callee, kinds::MEMBER_EXPRESSION) {
        let object = interp.required_child(callee, "object")?;
        let base = interp.eval(object, scope)?;
        if base.is_nullish() && tree.flag(callee, "optional") {
            return Ok(Value::Undefined);
        }
        let key = interp.property_key(callee, "property", scope)?;
        (get_property(&base, &key).map_err(|e| e.at(callee))?, base)
    } else {
        (interp.eval(callee, scope)?, Value::Undefined)
    };
    if function.is_nullish() && tree.flag(node, "optional") {
        return Ok(Value::Undefined);
    }
    let args = eval_arguments(interp, node, scope)?;
    interp.call_function(&function, this, args)
}

fn eval_arguments(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> Result<Vec<Value>, ControlAction> {
    let tree = interp.tree();
    let mut args = Vec::new();
    for &argument in tree.children(node, "arguments").iter().flatten() {
        if tree.is(argument, kinds::SPREAD_ELEMENT) {
            let inner = interp.required_child(argument, "argument")?;
            let spread = interp.eval(inner, scope)?;
            args.extend(iterate_values(&spread)?);
        } else {
            args.push(interp.eval(argument, scope)?);
        }
    }
    Ok(args)
}

pub fn unary_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let op = operator(tree, node)?;
    let argument = interp.required_child(node, "argument")?;
    if op == "delete" {
        return delete(interp, argument, scope);
    }
    let value = interp.eval(argument, scope)?;
    Ok(evaluate_unary(op, &value)?)
}

/// `delete obj.key` removes the field. Bindings cannot be deleted; other
/// operands are evaluated and report success.
fn delete(interp: &mut Interpreter<'_>, argument: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    if tree.is(argument, kinds::MEMBER_EXPRESSION) {
        let object = interp.required_child(argument, "object")?;
        let base = interp.eval(object, scope)?;
        let key = interp.property_key(argument, "property", scope)?;
        return Ok(Value::Bool(delete_property(&base, &key)?));
    }
    if tree.is(argument, kinds::IDENTIFIER) {
        return Ok(Value::Bool(false));
    }
    interp.eval(argument, scope)?;
    Ok(Value::Bool(true))
}

/// `++`/`--`, prefix and postfix. The postfix result is the old value
/// converted to a number.
pub fn update_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let op = operator(tree, node)?;
    let argument = interp.required_child(node, "argument")?;
    let place = interp.place(argument, scope)?;
    let old = Interpreter::read_place(&place, scope)?;
    let new = step(&old, op == "++");
    interp.write_place(place, new.clone(), scope)?;
    if tree.flag(node, "prefix") {
        Ok(new)
    } else {
        Ok(Value::Number(old.to_number()))
    }
}

pub fn binary_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let op = operator(interp.tree(), node)?;
    let left = interp.required_child(node, "left")?;
    let right = interp.required_child(node, "right")?;
    let left = interp.eval(left, scope)?;
    let right = interp.eval(right, scope)?;
    Ok(evaluate_binary(op, &left, &right)?)
}

/// `&&`, `||` and `??`: the right side runs only when needed.
pub fn logical_expression(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let op = operator(interp.tree(), node)?;
    let left = interp.required_child(node, "left")?;
    let right = interp.required_child(node, "right")?;
    let left = interp.eval(left, scope)?;
    let short_circuit = match op {
        "&&" => !left.is_truthy(),
        "||" => left.is_truthy(),
        "??" => !left.is_nullish(),
        _ => {
            return Err(EvalError::new(format!("unsupported logical operator '{op}'")).into());
        }
    };
    if short_circuit {
        Ok(left)
    } else {
        interp.eval(right, scope)
    }
}

/// Assignment, compound assignment and destructuring assignment. The value
/// of the expression is the value written.
pub fn assignment_expression(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let tree = interp.tree();
    let op = operator(tree, node)?;
    let left = interp.required_child(node, "left")?;
    let right = interp.required_child(node, "right")?;

    if op == "=" {
        if tree.is(left, kinds::OBJECT_PATTERN) || tree.is(left, kinds::ARRAY_PATTERN) {
            let value = interp.eval(right, scope)?;
            interp.bind_pattern(left, value.clone(), scope, Binding::Assign)?;
            return Ok(value);
        }
        let place = interp.place(left, scope)?;
        let name = match &place {
            Place::Binding(name) => Some(name.clone()),
            Place::Property { .. } => None,
        };
        let value = eval_named(interp, right, scope, name.as_ref())?;
        interp.write_place(place, value.clone(), scope)?;
        return Ok(value);
    }

    let place = interp.place(left, scope)?;
    let current = Interpreter::read_place(&place, scope)?;
    let value = match op {
        "&&=" | "||=" | "??=" => {
            let keep = match op {
                "&&=" => !current.is_truthy(),
                "||=" => current.is_truthy(),
                _ => !current.is_nullish(),
            };
            if keep {
                return Ok(current);
            }
            interp.eval(right, scope)?
        }
        _ => {
            let binary = op
                .strip_suffix('=')
                .ok_or_else(|| malformed_node("AssignmentExpression", format!("operator `{op}`")))?;
            let rhs = interp.eval(right, scope)?;
            evaluate_binary(binary, &current, &rhs)?
        }
    };
    interp.write_place(place, value.clone(), scope)?;
    Ok(value)
}

pub fn conditional_expression(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let test = interp.required_child(node, "test")?;
    let branch = if interp.eval(test, scope)?.is_truthy() {
        interp.required_child(node, "consequent")?
    } else {
        interp.required_child(node, "alternate")?
    };
    interp.eval(branch, scope)
}

pub fn sequence_expression(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let mut last = Value::Undefined;
    for &expression in interp.tree().children(node, "expressions").iter().flatten() {
        last = interp.eval(expression, scope)?;
    }
    Ok(last)
}
