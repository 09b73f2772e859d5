//! Closure creation and function calls.
//!
//! # Call sequence
//!
//! 1. A call-scope is created as a child of the closure's captured scope.
//! 2. The body is resolved against it, registering the body's hoisted
//!    declarations as placeholders.
//! 3. A named function expression binds its own name, unless the body
//!    declared the same name.
//! 4. Ordinary closures get `this` and `arguments` and own the dynamic
//!    context; arrows see their creator's through the scope chain.
//! 5. Parameters are bound left to right. A default runs in the call-scope
//!    when its argument is `undefined`; a rest parameter takes the tail.
//! 6. The body runs. A concise arrow body's value is the result; otherwise
//!    the first `return` wins and falling off the end yields `undefined`.

use estel_ir::{kinds, Name, NodeId, SyntaxTree};
use estel_runtime::{
    illegal_control_flow, malformed_node, not_callable, unsupported_node, ClosureKind,
    ClosureValue, ControlAction, EvalError, EvalResult, Heap, Param, ScopeRef, Value,
};

use super::Interpreter;
use crate::exec::pattern::Binding;

impl Interpreter<'_> {
    /// Call a closure or native function with a receiver and arguments.
    pub fn call_function(&mut self, callee: &Value, this: Value, args: Vec<Value>) -> EvalResult {
        match callee {
            Value::Closure(closure) => self.call_closure(closure, this, args),
            Value::Native(native) => Ok(native.call(&this, &args)?),
            other => Err(not_callable(other.type_name()).into()),
        }
    }

    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(function = closure.display_name(), depth = self.depth)
    )]
    fn call_closure(
        &mut self,
        closure: &Heap<ClosureValue>,
        this: Value,
        args: Vec<Value>,
    ) -> EvalResult {
        self.check_recursion_limit()?;
        let closure = closure.clone();

        let call_scope = closure.scope.new_child();
        let links = self
            .resolver
            .resolve_activation(&closure.tree, closure.body, &call_scope);

        if let Some(self_name) = &closure.self_name {
            if !call_scope.has_own(self_name) {
                call_scope.declare_own(self_name.clone(), Some(Value::Closure(closure.clone())));
            }
        }
        if closure.kind == ClosureKind::Ordinary {
            call_scope.declare_own("this", Some(this));
            call_scope.declare_own("arguments", Some(Value::array(args.clone())));
            call_scope.mark_dynamic_context();
        }

        let mut call_interpreter = self.create_function_interpreter(&closure.tree, &links);
        call_interpreter.bind_parameters(&closure.params, args, &call_scope)?;

        let result = if closure.expression_body {
            call_interpreter.eval(closure.body, &call_scope)
        } else {
            call_interpreter
                .eval(closure.body, &call_scope)
                .map(|_| Value::Undefined)
        };
        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Break) => Err(illegal_control_flow("break").into()),
            Err(ControlAction::Continue) => Err(illegal_control_flow("continue").into()),
            Err(other) => Err(other),
        }
    }

    fn bind_parameters(
        &mut self,
        params: &[Param],
        args: Vec<Value>,
        call_scope: &ScopeRef,
    ) -> Result<(), ControlAction> {
        let mut args = args.into_iter();
        for param in params {
            let value = if param.rest {
                Value::array(args.by_ref().collect())
            } else {
                args.next().unwrap_or_default()
            };
            let value = match param.default {
                Some(default) if value.is_undefined() => self.eval(default, call_scope)?,
                _ => value,
            };
            match &param.name {
                Some(name) => {
                    call_scope.declare_own(name.clone(), Some(value));
                }
                None => {
                    self.bind_pattern(param.target, value, call_scope, Binding::Declare(call_scope))?;
                }
            }
        }
        Ok(())
    }

    /// Create a closure for a function node capturing `scope`.
    ///
    /// `name` is used when the node has no `id` of its own, as for
    /// `const f = () => {}`.
    pub fn create_closure(
        &self,
        node: NodeId,
        scope: &ScopeRef,
        name: Option<Name>,
    ) -> Result<Value, EvalError> {
        let tree = self.tree();
        let tag = tree.tag(node);
        if tree.flag(node, "generator") {
            return Err(unsupported_node(&format!("{tag} (generator)")));
        }
        if tree.flag(node, "async") {
            return Err(unsupported_node(&format!("{tag} (async)")));
        }
        let body = tree
            .child(node, "body")
            .ok_or_else(|| malformed_node(tag, "missing `body`"))?;
        let kind = if tree.is(node, kinds::ARROW_FUNCTION_EXPRESSION) {
            ClosureKind::Arrow
        } else {
            ClosureKind::Ordinary
        };
        let id_name = tree
            .child(node, "id")
            .and_then(|id| tree.identifier_name(id))
            .cloned();
        let self_name = if tree.is(node, kinds::FUNCTION_EXPRESSION) {
            id_name.clone()
        } else {
            None
        };
        let params = tree
            .children(node, "params")
            .iter()
            .flatten()
            .map(|&param| parameter(tree, param))
            .collect();

        Ok(Value::closure(ClosureValue {
            name: id_name.or(name),
            self_name,
            kind,
            params,
            node,
            body,
            expression_body: !tree.is(body, kinds::BLOCK_STATEMENT),
            tree: self.tree().clone(),
            scope: scope.clone(),
        }))
    }
}

fn parameter(tree: &SyntaxTree, node: NodeId) -> Param {
    let (target, default, rest) = match tree.tag(node).as_str() {
        kinds::ASSIGNMENT_PATTERN => (
            tree.child(node, "left").unwrap_or(node),
            tree.child(node, "right"),
            false,
        ),
        kinds::REST_ELEMENT => (tree.child(node, "argument").unwrap_or(node), None, true),
        _ => (node, None, false),
    };
    Param {
        target,
        name: tree.identifier_name(target).cloned(),
        default,
        rest,
    }
}
