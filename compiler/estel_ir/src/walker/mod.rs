//! Tag-dispatched pre-order tree walker.
//!
//! Both interpreter passes are driven by this walker. For every node the
//! wildcard handler runs first, then the handler registered for the node's
//! tag. Either may return [`WalkAction::Skip`] to keep the walker out of that
//! node's children. A skip only affects the current walk: a later walk
//! started at the skipped node (for instance when a function body is
//! resolved at call time) visits those children normally.
//!
//! # Example
//!
//! ```text
//! let mut walker = Walker::<usize>::new();
//! walker.on("Identifier", |_, _, _, count| {
//!     *count += 1;
//!     WalkAction::Continue
//! });
//! walker.on("FunctionExpression", |_, _, _, _| WalkAction::Skip);
//! let mut count = 0;
//! walker.walk(&tree, &mut count);
//! ```

use rustc_hash::FxHashMap;

use crate::tree::{NodeId, SyntaxTree};
use crate::Name;
use estel_stack::ensure_sufficient_stack;

/// What the walker does after a node's handlers ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WalkAction {
    /// Descend into the node's children.
    #[default]
    Continue,
    /// Leave the node's children unvisited in this walk.
    Skip,
}

/// A walk handler: `(tree, node, parent, context) -> action`.
///
/// `parent` is `None` for the node a walk started at.
pub type WalkHandler<C> = fn(&SyntaxTree, NodeId, Option<NodeId>, &mut C) -> WalkAction;

/// Registry of walk handlers keyed by node tag, plus an optional wildcard.
pub struct Walker<C> {
    any: Option<WalkHandler<C>>,
    by_tag: FxHashMap<Name, WalkHandler<C>>,
}

impl<C> Walker<C> {
    pub fn new() -> Self {
        Walker {
            any: None,
            by_tag: FxHashMap::default(),
        }
    }

    /// Register the wildcard handler, returning the one it replaces.
    pub fn on_any(&mut self, handler: WalkHandler<C>) -> Option<WalkHandler<C>> {
        self.any.replace(handler)
    }

    /// Register a handler for `tag`, returning the one it replaces.
    pub fn on(&mut self, tag: impl Into<Name>, handler: WalkHandler<C>) -> Option<WalkHandler<C>> {
        self.by_tag.insert(tag.into(), handler)
    }

    /// Remove the handler for `tag`.
    pub fn remove(&mut self, tag: &str) -> Option<WalkHandler<C>> {
        self.by_tag.remove(tag)
    }

    /// The handler registered for `tag`, if any.
    pub fn handler(&self, tag: &str) -> Option<WalkHandler<C>> {
        self.by_tag.get(tag).copied()
    }

    /// Walk the whole tree from its root.
    pub fn walk(&self, tree: &SyntaxTree, cx: &mut C) {
        self.walk_from(tree, tree.root(), cx);
    }

    /// Walk the subtree rooted at `start`, treating `start` as parentless.
    pub fn walk_from(&self, tree: &SyntaxTree, start: NodeId, cx: &mut C) {
        self.visit(tree, start, None, cx);
    }

    fn visit(&self, tree: &SyntaxTree, node: NodeId, parent: Option<NodeId>, cx: &mut C) {
        ensure_sufficient_stack(|| {
            let mut action = WalkAction::Continue;
            if let Some(any) = self.any {
                action = any(tree, node, parent, cx);
            }
            if let Some(handler) = self.by_tag.get(tree.tag(node).as_str()) {
                if handler(tree, node, parent, cx) == WalkAction::Skip {
                    action = WalkAction::Skip;
                }
            }
            if action == WalkAction::Skip {
                return;
            }
            for child in tree.child_nodes(node) {
                self.visit(tree, child, Some(node), cx);
            }
        });
    }
}

impl<C> Default for Walker<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Walker<C> {
    fn clone(&self) -> Self {
        Walker {
            any: self.any,
            by_tag: self.by_tag.clone(),
        }
    }
}
