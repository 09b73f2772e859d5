//! Statement resolvers: statement lists, declarations, branches, loops,
//! `switch`, and `throw`/`try`.
//!
//! Non-local exits travel as `ControlAction`s. Loops consume `Break` and
//! `Continue`; calls consume `Return`; `try` consumes `Throw`.

use estel_ir::{kinds, Name, NodeId};
use estel_resolve::binding_names;
use estel_runtime::{unsupported_node, ControlAction, EvalResult, ScopeRef, Value};

use super::expr::eval_named;
use super::member::{enumerable_keys, iterate_values};
use super::pattern::Binding;
use crate::interpreter::Interpreter;

/// What a loop does after one run of its body.
enum LoopFlow {
    Next,
    Exit,
}

fn loop_flow(result: EvalResult) -> Result<LoopFlow, ControlAction> {
    match result {
        Ok(_) | Err(ControlAction::Continue) => Ok(LoopFlow::Next),
        Err(ControlAction::Break) => Ok(LoopFlow::Exit),
        Err(other) => Err(other),
    }
}

pub fn program(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    interp.eval_statements(node, "body", scope)
}

pub fn block_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let scope = interp.block_scope(node, scope);
    interp.eval_statements(node, "body", &scope)
}

pub fn expression_statement(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let expression = interp.required_child(node, "expression")?;
    interp.eval(expression, scope)
}

/// Statements with no runtime effect. Function declarations are bound when
/// their statement list starts; imports stay placeholders until a host
/// links them.
pub fn empty_statement(_: &mut Interpreter<'_>, _: NodeId, _: &ScopeRef) -> EvalResult {
    Ok(Value::Undefined)
}

pub fn variable_declaration(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let tree = interp.tree();
    let is_var = !matches!(
        tree.str_prop(node, "kind").map(Name::as_str),
        Some("let" | "const")
    );
    for &declarator in tree.children(node, "declarations").iter().flatten() {
        eval_declarator(interp, declarator, is_var, scope)?;
    }
    Ok(Value::Undefined)
}

/// Write a declarator's initial value into the cell its declaration was
/// hoisted to. A `var` without initializer keeps the cell as it is; `let`
/// and `const` without one reset it to `undefined`.
fn eval_declarator(
    interp: &mut Interpreter<'_>,
    declarator: NodeId,
    is_var: bool,
    scope: &ScopeRef,
) -> Result<(), ControlAction> {
    let tree = interp.tree();
    let id = interp.required_child(declarator, "id")?;
    let target = interp.declaration_target(declarator, scope);
    let Some(init) = tree.child(declarator, "init") else {
        if !is_var {
            for name in binding_names(tree, id) {
                target.declare_own(name, None);
            }
        }
        return Ok(());
    };
    let value = eval_named(interp, init, scope, tree.identifier_name(id))?;
    interp.bind_pattern(id, value, scope, Binding::Declare(&target))
}

pub fn if_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let test = interp.required_child(node, "test")?;
    if interp.eval(test, scope)?.is_truthy() {
        let consequent = interp.required_child(node, "consequent")?;
        interp.eval(consequent, scope)
    } else if let Some(alternate) = interp.tree().child(node, "alternate") {
        interp.eval(alternate, scope)
    } else {
        Ok(Value::Undefined)
    }
}

/// `for (init; test; update) body`. The loop owns one scope for all its
/// iterations.
pub fn for_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let scope = interp.block_scope(node, scope);
    let body = interp.required_child(node, "body")?;
    if let Some(init) = tree.child(node, "init") {
        interp.eval(init, &scope)?;
    }
    loop {
        if let Some(test) = tree.child(node, "test") {
            if !interp.eval(test, &scope)?.is_truthy() {
                break;
            }
        }
        if let LoopFlow::Exit = loop_flow(interp.eval(body, &scope))? {
            break;
        }
        if let Some(update) = tree.child(node, "update") {
            interp.eval(update, &scope)?;
        }
    }
    Ok(Value::Undefined)
}

/// `for (left in right)`: object field names, or array and string indices.
pub fn for_in_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let right = interp.required_child(node, "right")?;
    let subject = interp.eval(right, scope)?;
    let keys = enumerable_keys(&subject)
        .into_iter()
        .map(|key| Value::string(key.as_str()));
    run_iteration(interp, node, keys, scope)
}

/// `for (left of right)`: array elements or string characters.
pub fn for_of_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let right = interp.required_child(node, "right")?;
    let subject = interp.eval(right, scope)?;
    let values = iterate_values(&subject).map_err(|e| e.at(right))?;
    run_iteration(interp, node, values, scope)
}

fn run_iteration(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    values: impl IntoIterator<Item = Value>,
    scope: &ScopeRef,
) -> EvalResult {
    let tree = interp.tree();
    let left = interp.required_child(node, "left")?;
    let body = interp.required_child(node, "body")?;
    for value in values {
        if tree.is(left, kinds::VARIABLE_DECLARATION) {
            let Some(&Some(declarator)) = tree.children(left, "declarations").first() else {
                return Err(unsupported_node("VariableDeclaration (empty)").at(left).into());
            };
            let id = interp.required_child(declarator, "id")?;
            let target = interp.declaration_target(declarator, scope);
            interp.bind_pattern(id, value, scope, Binding::Declare(&target))?;
        } else {
            interp.bind_pattern(left, value, scope, Binding::Assign)?;
        }
        if let LoopFlow::Exit = loop_flow(interp.eval(body, scope))? {
            break;
        }
    }
    Ok(Value::Undefined)
}

pub fn while_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let test = interp.required_child(node, "test")?;
    let body = interp.required_child(node, "body")?;
    while interp.eval(test, scope)?.is_truthy() {
        if let LoopFlow::Exit = loop_flow(interp.eval(body, scope))? {
            break;
        }
    }
    Ok(Value::Undefined)
}

pub fn do_while_statement(
    interp: &mut Interpreter<'_>,
    node: NodeId,
    scope: &ScopeRef,
) -> EvalResult {
    let test = interp.required_child(node, "test")?;
    let body = interp.required_child(node, "body")?;
    loop {
        if let LoopFlow::Exit = loop_flow(interp.eval(body, scope))? {
            break;
        }
        if !interp.eval(test, scope)?.is_truthy() {
            break;
        }
    }
    Ok(Value::Undefined)
}

/// `switch`: the first case whose test is strictly equal to the
/// discriminant, else `default`, then fall through until `break`.
pub fn switch_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let discriminant = interp.required_child(node, "discriminant")?;
    let discriminant = interp.eval(discriminant, scope)?;
    let scope = interp.block_scope(node, scope);
    let cases = tree.children(node, "cases");
    for &case in cases.iter().flatten() {
        interp.instantiate_functions(tree.children(case, "consequent"), &scope)?;
    }

    let mut start = None;
    for (index, case) in cases.iter().enumerate() {
        let Some(test) = case.and_then(|case| tree.child(case, "test")) else {
            continue;
        };
        if interp.eval(test, &scope)?.strict_equals(&discriminant) {
            start = Some(index);
            break;
        }
    }
    let start = start.or_else(|| {
        cases
            .iter()
            .position(|case| case.is_some_and(|case| tree.child(case, "test").is_none()))
    });
    let Some(start) = start else {
        return Ok(Value::Undefined);
    };

    for &case in cases[start..].iter().flatten() {
        for &statement in tree.children(case, "consequent").iter().flatten() {
            match interp.eval(statement, &scope) {
                Ok(_) => {}
                Err(ControlAction::Break) => return Ok(Value::Undefined),
                Err(other) => return Err(other),
            }
        }
    }
    Ok(Value::Undefined)
}

pub fn break_statement(interp: &mut Interpreter<'_>, node: NodeId, _: &ScopeRef) -> EvalResult {
    if interp.tree().child(node, "label").is_some() {
        return Err(unsupported_node("LabeledStatement").into());
    }
    Err(ControlAction::Break)
}

pub fn continue_statement(interp: &mut Interpreter<'_>, node: NodeId, _: &ScopeRef) -> EvalResult {
    if interp.tree().child(node, "label").is_some() {
        return Err(unsupported_node("LabeledStatement").into());
    }
    Err(ControlAction::Continue)
}

pub fn return_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let value = match interp.tree().child(node, "argument") {
        Some(argument) => interp.eval(argument, scope)?,
        None => Value::Undefined,
    };
    Err(ControlAction::Return(value))
}

pub fn throw_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let argument = interp.required_child(node, "argument")?;
    let value = interp.eval(argument, scope)?;
    Err(ControlAction::Throw(value))
}

/// `try`/`catch`/`finally`. `catch` receives thrown values only; evaluation
/// errors pass through it. A `finally` that exits abruptly replaces the
/// outcome of the rest.
pub fn try_statement(interp: &mut Interpreter<'_>, node: NodeId, scope: &ScopeRef) -> EvalResult {
    let tree = interp.tree();
    let block = interp.required_child(node, "block")?;
    let result = match (interp.eval(block, scope), tree.child(node, "handler")) {
        (Err(ControlAction::Throw(thrown)), Some(handler)) => {
            catch_clause(interp, handler, thrown, scope)
        }
        (result, _) => result,
    };
    if let Some(finalizer) = tree.child(node, "finalizer") {
        interp.eval(finalizer, scope)?;
    }
    result
}

/// Run a catch clause: the parameter is bound in the body's own scope.
fn catch_clause(
    interp: &mut Interpreter<'_>,
    clause: NodeId,
    thrown: Value,
    scope: &ScopeRef,
) -> EvalResult {
    let body = interp.required_child(clause, "body")?;
    let body_scope = interp.block_scope(body, scope);
    if let Some(param) = interp.tree().child(clause, "param") {
        interp.bind_pattern(param, thrown, &body_scope, Binding::Declare(&body_scope))?;
    }
    interp.eval_statements(body, "body", &body_scope)
}
