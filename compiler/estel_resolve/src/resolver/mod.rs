//! The name resolver: walk handlers implementing the hoisting rules.

use estel_ir::kinds;
use estel_ir::{Name, NodeId, SharedTree, SyntaxTree, WalkAction, WalkHandler, Walker};
use estel_runtime::{ScopeRef, StructuralError};

use crate::hoist::{binding_names, bubble_to_block, bubble_to_function};
use crate::links::{ResolvedTree, ScopeLinks};

/// Walk state for one resolution.
pub struct ResolveContext {
    links: ScopeLinks,
}

impl ResolveContext {
    fn new(root: NodeId, root_scope: ScopeRef) -> Self {
        ResolveContext {
            links: ScopeLinks::new(root, root_scope),
        }
    }

    /// Links recorded so far.
    #[inline]
    pub fn links(&self) -> &ScopeLinks {
        &self.links
    }

    /// Scope of a visited node (the root scope for unvisited nodes).
    pub fn scope_of(&self, node: NodeId) -> ScopeRef {
        self.links.scope_or_root(node)
    }

    /// Register `names` as placeholder cells in `scope` and record `scope`
    /// as `node`'s declaration target.
    ///
    /// Cells that already exist keep their value, so resolving a body after
    /// its parameters were bound, or re-declaring a host-provided global,
    /// does not reset anything.
    pub fn declare(
        &mut self,
        node: NodeId,
        scope: &ScopeRef,
        names: impl IntoIterator<Item = Name>,
    ) {
        for name in names {
            if !scope.has_own(&name) {
                tracing::trace!(name = %name, ?node, "declare");
                scope.declare_own(name, None);
            }
        }
        self.links.set_target(node, scope.clone());
    }
}

/// Pass 1: builds scope links and registers declarations.
///
/// The default rules can be extended or overridden per node tag with
/// [`NameResolver::with_handler`].
#[derive(Clone)]
pub struct NameResolver {
    walker: Walker<ResolveContext>,
}

impl NameResolver {
    /// A resolver with the default hoisting rules.
    pub fn new() -> Self {
        let mut walker = Walker::new();
        walker.on_any(stamp_links);
        walker.on(kinds::VARIABLE_DECLARATOR, variable_declarator);
        walker.on(kinds::FUNCTION_DECLARATION, function_declaration);
        walker.on(kinds::FUNCTION_EXPRESSION, skip_body);
        walker.on(kinds::ARROW_FUNCTION_EXPRESSION, skip_body);
        walker.on(kinds::CLASS_DECLARATION, class_declaration);
        walker.on(kinds::CLASS_BODY, class_body);
        walker.on(kinds::BLOCK_STATEMENT, catch_block);
        walker.on(kinds::IMPORT_SPECIFIER, import_specifier);
        walker.on(kinds::IMPORT_DEFAULT_SPECIFIER, import_specifier);
        walker.on(kinds::IMPORT_NAMESPACE_SPECIFIER, import_specifier);
        NameResolver { walker }
    }

    /// Add or replace the handler for `tag`.
    #[must_use]
    pub fn with_handler(
        mut self,
        tag: impl Into<Name>,
        handler: WalkHandler<ResolveContext>,
    ) -> Self {
        self.walker.on(tag, handler);
        self
    }

    /// Add or replace the handler for `tag`, returning the replaced one.
    pub fn set_handler(
        &mut self,
        tag: impl Into<Name>,
        handler: WalkHandler<ResolveContext>,
    ) -> Option<WalkHandler<ResolveContext>> {
        self.walker.on(tag, handler)
    }

    /// Resolve a whole tree against a fresh root scope.
    ///
    /// `root_scope` becomes owned by the tree's root node; a scope that
    /// already belongs to a node is rejected.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
    pub fn resolve(
        &self,
        tree: &SharedTree,
        root_scope: &ScopeRef,
    ) -> Result<ResolvedTree, StructuralError> {
        if let Some(owner) = root_scope.owner() {
            return Err(StructuralError::RootScopeAlreadyBound { owner });
        }
        root_scope.set_owner(Some(tree.root()));
        let links = self.run(tree, tree.root(), root_scope);
        tracing::debug!(
            visited = links.len(),
            names = root_scope.count_own(),
            "resolved names"
        );
        Ok(ResolvedTree {
            tree: tree.clone(),
            root_scope: root_scope.clone(),
            links,
        })
    }

    /// Resolve a function body for one call.
    ///
    /// `body` is the resolution root and maps to `call_scope`, so `var` and
    /// function declarations stop bubbling at the body.
    #[tracing::instrument(level = "trace", skip(self, tree, call_scope))]
    pub fn resolve_activation(
        &self,
        tree: &SyntaxTree,
        body: NodeId,
        call_scope: &ScopeRef,
    ) -> ScopeLinks {
        if call_scope.owner().is_none() {
            call_scope.set_owner(Some(body));
        }
        self.run(tree, body, call_scope)
    }

    fn run(&self, tree: &SyntaxTree, root: NodeId, root_scope: &ScopeRef) -> ScopeLinks {
        let mut cx = ResolveContext::new(root, root_scope.clone());
        self.walker.walk_from(tree, root, &mut cx);
        cx.links
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

// Default handlers

/// Stamp the parent and scope links. Block-like nodes other than the
/// resolution root open a child scope.
fn stamp_links(
    tree: &SyntaxTree,
    node: NodeId,
    parent: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let Some(parent) = parent else {
        return WalkAction::Continue;
    };
    cx.links.set_parent(node, parent);
    let parent_scope = cx.scope_of(parent);
    let scope = if kinds::is_block_tag(tree.tag(node)) {
        let scope = parent_scope.new_child();
        scope.set_owner(Some(node));
        scope
    } else {
        parent_scope
    };
    cx.links.set_scope(node, scope);
    WalkAction::Continue
}

fn variable_declarator(
    tree: &SyntaxTree,
    node: NodeId,
    parent: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let is_var = parent
        .and_then(|p| tree.str_prop(p, "kind"))
        .map_or(true, |kind| kind == "var");
    let target = if is_var {
        bubble_to_function(tree, cx.links(), &cx.scope_of(node))
    } else {
        cx.scope_of(bubble_to_block(tree, cx.links(), node))
    };
    let names = tree
        .child(node, "id")
        .map(|id| binding_names(tree, id))
        .unwrap_or_default();
    cx.declare(node, &target, names);
    WalkAction::Continue
}

fn function_declaration(
    tree: &SyntaxTree,
    node: NodeId,
    _: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let target = bubble_to_function(tree, cx.links(), &cx.scope_of(node));
    let name = tree
        .child(node, "id")
        .and_then(|id| tree.identifier_name(id))
        .cloned();
    cx.declare(node, &target, name);
    WalkAction::Skip
}

/// Function expressions and arrows: bodies are resolved per call.
fn skip_body(_: &SyntaxTree, _: NodeId, _: Option<NodeId>, _: &mut ResolveContext) -> WalkAction {
    WalkAction::Skip
}

fn class_declaration(
    tree: &SyntaxTree,
    node: NodeId,
    _: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let target = cx.scope_of(bubble_to_block(tree, cx.links(), node));
    let name = tree
        .child(node, "id")
        .and_then(|id| tree.identifier_name(id))
        .cloned();
    cx.declare(node, &target, name);
    WalkAction::Continue
}

/// A named class expression can refer to itself inside its body.
fn class_body(
    tree: &SyntaxTree,
    node: NodeId,
    parent: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let self_name = parent
        .filter(|&p| tree.is(p, kinds::CLASS_EXPRESSION))
        .and_then(|p| tree.child(p, "id"))
        .and_then(|id| tree.identifier_name(id))
        .cloned();
    if let Some(name) = self_name {
        let scope = cx.scope_of(node);
        cx.declare(node, &scope, Some(name));
    }
    WalkAction::Skip
}

/// The body of a `catch` clause declares the clause's parameter.
fn catch_block(
    tree: &SyntaxTree,
    node: NodeId,
    parent: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let Some(clause) = parent.filter(|&p| tree.is(p, kinds::CATCH_CLAUSE)) else {
        return WalkAction::Continue;
    };
    if let Some(param) = tree.child(clause, "param") {
        let scope = cx.scope_of(node);
        cx.declare(node, &scope, binding_names(tree, param));
    }
    WalkAction::Continue
}

fn import_specifier(
    tree: &SyntaxTree,
    node: NodeId,
    _: Option<NodeId>,
    cx: &mut ResolveContext,
) -> WalkAction {
    let name = tree
        .child(node, "local")
        .and_then(|id| tree.identifier_name(id))
        .cloned();
    let scope = cx.scope_of(node);
    cx.declare(node, &scope, name);
    WalkAction::Continue
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
