//! Owning entry point for pass 2.

use estel_ir::SharedTree;
use estel_resolve::{NameResolver, ResolvedTree, ScopeLinks};
use estel_runtime::{EvalError, Value};

use crate::config::EvalConfig;
use crate::interpreter::Interpreter;
use crate::registry::ResolverRegistry;

/// Holds the resolver registry, the name resolver used for function
/// bodies, and the evaluation limits. Interpreters borrow from it.
#[derive(Clone, Default)]
pub struct Evaluator {
    registry: ResolverRegistry,
    resolver: NameResolver,
    config: EvalConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_registry(mut self, registry: ResolverRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Resolver name resolution for function bodies uses. Give it the same
    /// handlers the top-level pass used.
    #[must_use]
    pub fn with_resolver(mut self, resolver: NameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.registry
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut NameResolver {
        &mut self.resolver
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// An interpreter over `tree` with `links`, at depth zero.
    pub fn interpreter<'a>(&'a self, tree: &'a SharedTree, links: &'a ScopeLinks) -> Interpreter<'a> {
        Interpreter::builder(tree, links, &self.registry, &self.resolver)
            .config(self.config)
            .build()
    }

    /// Evaluate a resolved tree from its root.
    ///
    /// Side effects land in the tree's root scope, which stays usable by
    /// the host afterwards.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = resolved.tree.len()))]
    pub fn evaluate(&self, resolved: &ResolvedTree) -> Result<Value, EvalError> {
        let result = self
            .interpreter(&resolved.tree, &resolved.links)
            .eval_program();
        if let Err(err) = &result {
            tracing::debug!(%err, "evaluation failed");
        }
        result
    }
}
