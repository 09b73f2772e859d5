//! Callable values: script closures and host functions.

use std::fmt;

use estel_ir::{Name, NodeId, SharedTree};

use super::Value;
use crate::errors::EvalError;
use crate::scope::ScopeRef;

/// How a closure binds its dynamic context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClosureKind {
    /// `function` declarations and expressions: own `this` and `arguments`.
    Ordinary,
    /// Arrow functions: `this` and `arguments` come from the lexical chain.
    Arrow,
}

/// One formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// The binding target: an `Identifier` or a destructuring pattern.
    pub target: NodeId,
    /// The bound name when `target` is a plain identifier.
    pub name: Option<Name>,
    /// Default expression (`a = 1`), used when the argument is `undefined`.
    pub default: Option<NodeId>,
    /// Whether this is a rest parameter (`...rest`).
    pub rest: bool,
}

/// A function value with its captured defining scope.
///
/// The captured scope is fixed at creation. Every call creates a fresh
/// call-scope parented at it, so the closure observes later writes to the
/// captured cells instead of a snapshot.
#[derive(Clone)]
pub struct ClosureValue {
    /// Name used for display and the `name` property.
    pub name: Option<Name>,
    /// Name a named function expression binds to itself inside its body.
    pub self_name: Option<Name>,
    pub kind: ClosureKind,
    pub params: Vec<Param>,
    /// The function node the closure was created from.
    pub node: NodeId,
    /// Body node: a `BlockStatement`, or an expression for concise arrows.
    pub body: NodeId,
    /// Whether `body` is a bare expression (`x => x + 1`).
    pub expression_body: bool,
    /// The tree `node` and `body` belong to.
    pub tree: SharedTree,
    /// The captured defining scope.
    pub scope: ScopeRef,
}

impl ClosureValue {
    /// Declared parameter count: parameters before the first default or rest.
    pub fn arity(&self) -> usize {
        self.params
            .iter()
            .take_while(|p| p.default.is_none() && !p.rest)
            .count()
    }

    #[inline]
    pub fn is_arrow(&self) -> bool {
        self.kind == ClosureKind::Arrow
    }

    /// Display name; anonymous closures have an empty name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for ClosureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureValue")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params.len())
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// Host function signature: `(this, arguments) -> result`.
pub type NativeFn = fn(&Value, &[Value]) -> Result<Value, EvalError>;

/// A function implemented by the host.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        NativeFunction { name, func }
    }

    /// Invoke with a receiver and arguments.
    #[inline]
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(this, args)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.func as usize == other.func as usize
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}
