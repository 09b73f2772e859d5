//! Estel - a two-pass interpreter core for a lexically scoped scripting
//! language.
//!
//! # Architecture
//!
//! ```text
//! ESTree JSON / TreeBuilder
//!     │
//!     ▼
//! SyntaxTree ──► resolve_names() ──► ResolvedTree (scope graph + links)
//!                                         │
//!                                         ▼
//!                                  evaluate_values() ──► values in scope cells
//! ```
//!
//! Pass 1 registers every declaration as a placeholder cell in the scope it
//! hoists to. Pass 2 computes values and writes them into those cells.
//! Function bodies are resolved lazily, once per call.
//!
//! Hosts extend both passes through [`Engine`]: walk handlers for pass 1 and
//! value resolvers for pass 2, keyed by node tag.

use std::sync::Once;

pub use estel_eval::{
    EvalConfig, Evaluator, Interpreter, InterpreterBuilder, ResolverRegistry, ValueResolver,
    DEFAULT_MAX_ARRAY_LENGTH, DEFAULT_MAX_CALL_DEPTH,
};
pub use estel_ir::{
    ImportError, LiteralValue, Name, NodeId, Prop, SharedTree, SyntaxTree, TreeBuilder,
    WalkAction, WalkHandler,
};
pub use estel_resolve::{NameResolver, ResolveContext, ResolvedTree, ScopeLinks};
pub use estel_runtime::{
    ClosureValue, ControlAction, EvalError, EvalErrorKind, EvalResult, NativeFunction, ScopeRef,
    StructuralError, Value,
};

/// Any failure of a full run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A fresh root scope with no parent and no cells.
pub fn create_root_scope() -> ScopeRef {
    ScopeRef::root()
}

/// Pass 1 with the default hoisting rules.
pub fn resolve_names(tree: &SharedTree, root: &ScopeRef) -> Result<ResolvedTree, StructuralError> {
    NameResolver::new().resolve(tree, root)
}

/// Pass 2 with the default value resolvers. Returns the tree so the host
/// can keep querying its scopes.
pub fn evaluate_values(resolved: ResolvedTree) -> Result<ResolvedTree, EvalError> {
    Evaluator::new().evaluate(&resolved)?;
    Ok(resolved)
}

/// Both passes with host extensions.
#[derive(Clone, Default)]
pub struct Engine {
    evaluator: Evaluator,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the pass 2 resolver for `tag`.
    #[must_use]
    pub fn with_value_resolver(mut self, tag: impl Into<Name>, resolver: ValueResolver) -> Self {
        self.evaluator.registry_mut().register(tag, resolver);
        self
    }

    /// Add or replace the pass 1 handler for `tag`. Function bodies resolved
    /// at call time use it too.
    #[must_use]
    pub fn with_walk_handler(
        mut self,
        tag: impl Into<Name>,
        handler: WalkHandler<ResolveContext>,
    ) -> Self {
        self.evaluator.resolver_mut().set_handler(tag, handler);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.evaluator = self.evaluator.with_config(config);
        self
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn resolve_names(
        &self,
        tree: &SharedTree,
        root: &ScopeRef,
    ) -> Result<ResolvedTree, StructuralError> {
        self.evaluator.resolver().resolve(tree, root)
    }

    pub fn evaluate_values(&self, resolved: ResolvedTree) -> Result<ResolvedTree, EvalError> {
        self.evaluator.evaluate(&resolved)?;
        Ok(resolved)
    }

    /// Resolve then evaluate `tree` against `root`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&self, tree: &SharedTree, root: &ScopeRef) -> Result<ResolvedTree, Error> {
        let resolved = self.resolve_names(tree, root)?;
        Ok(self.evaluate_values(resolved)?)
    }

    /// Import ESTree JSON text, then [`Engine::run`] it against a fresh
    /// root scope.
    pub fn run_json(&self, text: &str) -> Result<ResolvedTree, Error> {
        let tree = SyntaxTree::from_estree_json(text)?.into_shared();
        self.run(&tree, &create_root_scope())
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=estel_eval=debug` or `RUST_LOG=estel_resolve=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
