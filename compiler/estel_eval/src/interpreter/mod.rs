//! Tree-walking interpreter for Estel.
//!
//! # Architecture
//!
//! All evaluation goes through [`Interpreter::eval`], which looks the node's
//! tag up in the [`ResolverRegistry`] and runs the resolver found there.
//! Resolvers live in `crate::exec`:
//!
//! - `exec::expr` - literals, identifiers, operators, members, calls
//! - `exec::control` - statement lists, loops, `switch`, `try`
//! - `exec::pattern` - assignment targets and destructuring
//! - `exec::member` - property reads and writes on runtime values
//!
//! # Activations
//!
//! An interpreter evaluates one activation: the top-level program, or one
//! call of a closure. Each call resolves the closure's body against a fresh
//! call-scope (see `estel_resolve::NameResolver::resolve_activation`) and
//! evaluates it with a child interpreter that borrows those links and the
//! closure's own tree. Use [`Interpreter::create_function_interpreter`] to
//! set up that context.

mod builder;
mod function_call;

pub use builder::InterpreterBuilder;

use estel_ir::{kinds, NodeId, SharedTree};
use estel_resolve::{NameResolver, ScopeLinks};
use estel_runtime::{
    malformed_node, recursion_limit_exceeded, unsupported_node, ControlAction, EvalError,
    EvalResult, ScopeRef, Value,
};
use estel_stack::ensure_sufficient_stack;

use crate::config::EvalConfig;
use crate::registry::ResolverRegistry;

/// Evaluates one activation.
pub struct Interpreter<'a> {
    /// The tree the evaluated nodes belong to.
    tree: &'a SharedTree,
    /// Scope links for this activation.
    links: &'a ScopeLinks,
    registry: &'a ResolverRegistry,
    /// Resolves function bodies at call time.
    resolver: &'a NameResolver,
    config: EvalConfig,
    /// Number of interpreted calls enclosing this activation.
    depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter builder.
    pub fn builder(
        tree: &'a SharedTree,
        links: &'a ScopeLinks,
        registry: &'a ResolverRegistry,
        resolver: &'a NameResolver,
    ) -> InterpreterBuilder<'a> {
        InterpreterBuilder::new(tree, links, registry, resolver)
    }

    #[inline]
    pub fn tree(&self) -> &'a SharedTree {
        self.tree
    }

    #[inline]
    pub fn links(&self) -> &'a ScopeLinks {
        self.links
    }

    #[inline]
    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Interpreted call depth of this activation.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluate `node` in `scope`.
    ///
    /// Errors carry the innermost node they were raised at.
    pub fn eval(&mut self, node: NodeId, scope: &ScopeRef) -> EvalResult {
        ensure_sufficient_stack(|| {
            let tree = self.tree();
            let tag = tree.tag(node);
            let Some(resolver) = self.registry.get(tag) else {
                return Err(unsupported_node(tag).at(node).into());
            };
            resolver(self, node, scope).map_err(|action| action.at(node))
        })
    }

    /// Evaluate the activation root in its scope.
    ///
    /// A `throw` nobody caught, or a `return`/`break`/`continue` with nothing
    /// to receive it, becomes an [`EvalError`].
    #[tracing::instrument(level = "debug", skip_all, fields(root = %self.links.root()))]
    pub fn eval_program(&mut self) -> Result<Value, EvalError> {
        let root = self.links.root();
        let scope = self.links.root_scope().clone();
        self.eval(root, &scope)
            .map_err(ControlAction::into_eval_error)
    }

    /// Check if the current call depth reached the configured limit.
    #[inline]
    pub(crate) fn check_recursion_limit(&self) -> Result<(), EvalError> {
        if self.depth >= self.config.max_call_depth {
            tracing::debug!(depth = self.depth, "call depth limit reached");
            return Err(recursion_limit_exceeded(self.config.max_call_depth));
        }
        Ok(())
    }

    /// Create an interpreter for one call of a closure.
    ///
    /// The child evaluates nodes of the closure's tree with the links of the
    /// call's activation. Registry, resolver and configuration are shared
    /// with the caller; the depth grows by one.
    pub(crate) fn create_function_interpreter<'b>(
        &self,
        tree: &'b SharedTree,
        links: &'b ScopeLinks,
    ) -> Interpreter<'b>
    where
        'a: 'b,
    {
        Interpreter {
            tree,
            links,
            registry: self.registry,
            resolver: self.resolver,
            config: self.config,
            depth: self.depth + 1,
        }
    }

    /// A child node that the node's tag requires.
    pub fn required_child(&self, node: NodeId, key: &str) -> Result<NodeId, EvalError> {
        let tree = self.tree();
        tree.child(node, key)
            .ok_or_else(|| malformed_node(tree.tag(node), format!("missing `{key}`")))
    }

    /// The scope a block-like node evaluates its body in.
    ///
    /// Blocks the resolver never visited get a fresh child of `scope`.
    pub fn block_scope(&self, node: NodeId, scope: &ScopeRef) -> ScopeRef {
        match self.links.scope(node) {
            Some(own) => own.clone(),
            None => scope.new_child(),
        }
    }

    /// The scope a declaring node's names were registered in, or `scope`
    /// when the resolver recorded none.
    pub fn declaration_target(&self, node: NodeId, scope: &ScopeRef) -> ScopeRef {
        self.links
            .target(node)
            .cloned()
            .unwrap_or_else(|| scope.clone())
    }

    /// Run the statement list under `owner.key`: instantiate its function
    /// declarations, then evaluate each statement in order.
    ///
    /// Returns the value of the last statement.
    pub fn eval_statements(&mut self, owner: NodeId, key: &str, scope: &ScopeRef) -> EvalResult {
        let statements = self.tree().children(owner, key);
        self.instantiate_functions(statements, scope)?;
        let mut last = Value::Undefined;
        for &statement in statements.iter().flatten() {
            last = self.eval(statement, scope)?;
        }
        Ok(last)
    }

    /// Bind every function declaration in `statements` before any of them
    /// runs, so calls that precede a declaration see it.
    pub(crate) fn instantiate_functions(
        &mut self,
        statements: &[Option<NodeId>],
        scope: &ScopeRef,
    ) -> Result<(), EvalError> {
        let tree = self.tree();
        for &statement in statements.iter().flatten() {
            if !tree.is(statement, kinds::FUNCTION_DECLARATION) {
                continue;
            }
            let Some(name) = tree
                .child(statement, "id")
                .and_then(|id| tree.identifier_name(id))
            else {
                continue;
            };
            let closure = self.create_closure(statement, scope, None)?;
            self.declaration_target(statement, scope)
                .declare_own(name.clone(), Some(closure));
        }
        Ok(())
    }
}
