//! Per-node side tables produced by name resolution.

use rustc_hash::FxHashMap;

use estel_ir::{NodeId, SharedTree};
use estel_runtime::ScopeRef;

/// Parent, scope and declaration-target links for one resolution.
///
/// A top-level resolution covers the tree minus function bodies; each call
/// produces another `ScopeLinks` covering that call's body.
#[derive(Debug)]
pub struct ScopeLinks {
    root: NodeId,
    root_scope: ScopeRef,
    parents: FxHashMap<NodeId, NodeId>,
    scopes: FxHashMap<NodeId, ScopeRef>,
    targets: FxHashMap<NodeId, ScopeRef>,
}

impl ScopeLinks {
    pub(crate) fn new(root: NodeId, root_scope: ScopeRef) -> Self {
        let mut scopes = FxHashMap::default();
        scopes.insert(root, root_scope.clone());
        ScopeLinks {
            root,
            root_scope,
            parents: FxHashMap::default(),
            scopes,
            targets: FxHashMap::default(),
        }
    }

    /// The node resolution started at.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The scope the resolution root maps to.
    #[inline]
    pub fn root_scope(&self) -> &ScopeRef {
        &self.root_scope
    }

    /// Whether `node` was visited by this resolution.
    pub fn contains(&self, node: NodeId) -> bool {
        self.scopes.contains_key(&node)
    }

    /// Parent of a visited node; `None` for the root and unvisited nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    /// Scope a visited node evaluates in. A block-like node maps to the
    /// scope it opened.
    pub fn scope(&self, node: NodeId) -> Option<&ScopeRef> {
        self.scopes.get(&node)
    }

    /// Scope of `node`, or the root scope when `node` was not visited.
    pub fn scope_or_root(&self, node: NodeId) -> ScopeRef {
        self.scope(node).unwrap_or(&self.root_scope).clone()
    }

    /// Scope a declaring node's names were registered in.
    pub fn target(&self, node: NodeId) -> Option<&ScopeRef> {
        self.targets.get(&node)
    }

    /// Number of visited nodes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub(crate) fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        self.parents.insert(node, parent);
    }

    pub(crate) fn set_scope(&mut self, node: NodeId, scope: ScopeRef) {
        self.scopes.insert(node, scope);
    }

    pub(crate) fn set_target(&mut self, node: NodeId, scope: ScopeRef) {
        self.targets.insert(node, scope);
    }
}

/// A tree after pass 1: the tree, its root scope, and the top-level links.
#[derive(Debug)]
pub struct ResolvedTree {
    pub tree: SharedTree,
    pub root_scope: ScopeRef,
    pub links: ScopeLinks,
}
