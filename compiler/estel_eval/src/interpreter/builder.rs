//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use estel_ir::SharedTree;
use estel_resolve::{NameResolver, ScopeLinks};

use super::Interpreter;
use crate::config::EvalConfig;
use crate::registry::ResolverRegistry;

/// Builder for creating Interpreter instances.
///
/// The tree, its links, the resolver registry and the name resolver are
/// required; configuration and starting depth default to
/// `EvalConfig::default()` and zero.
pub struct InterpreterBuilder<'a> {
    tree: &'a SharedTree,
    links: &'a ScopeLinks,
    registry: &'a ResolverRegistry,
    resolver: &'a NameResolver,
    config: EvalConfig,
    depth: usize,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(
        tree: &'a SharedTree,
        links: &'a ScopeLinks,
        registry: &'a ResolverRegistry,
        resolver: &'a NameResolver,
    ) -> Self {
        Self {
            tree,
            links,
            registry,
            resolver,
            config: EvalConfig::default(),
            depth: 0,
        }
    }

    /// Set the evaluation limits.
    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Start at a call depth other than zero, for hosts that evaluate from
    /// inside a native function.
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            tree: self.tree,
            links: self.links,
            registry: self.registry,
            resolver: self.resolver,
            config: self.config,
            depth: self.depth,
        }
    }
}
