//! Arena-allocated ESTree-shaped syntax tree.
//!
//! Every node is a type tag plus an ordered list of named properties. Child
//! nodes are referenced by `NodeId`; the tree itself carries no parent links
//! and no scope information. Those are side tables produced by name
//! resolution, which keeps the tree immutable and shareable.

// Rc is the implementation of SharedTree
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of SharedTree"
)]

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::kinds;
use crate::Name;

/// Index into a `SyntaxTree`'s node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Prop {
    /// A single child node.
    Node(NodeId),
    /// A list of child nodes; `None` marks a hole (`[a, , b]`).
    List(Vec<Option<NodeId>>),
    /// A string scalar (`name`, `operator`, `kind`, string literal values).
    Str(Name),
    /// A numeric scalar.
    Num(f64),
    /// A boolean scalar (`computed`, `shorthand`, `prefix`, ...).
    Bool(bool),
    /// An explicit `null` (absent optional child, `null` literal value).
    Null,
}

/// A syntax node: type tag plus named properties in declaration order.
#[derive(Clone, Debug)]
pub struct Node {
    tag: Name,
    props: SmallVec<[(Name, Prop); 4]>,
}

impl Node {
    pub(crate) fn new(tag: Name, props: SmallVec<[(Name, Prop); 4]>) -> Self {
        Node { tag, props }
    }

    /// The node's type tag (`"Identifier"`, `"CallExpression"`, ...).
    #[inline]
    pub fn tag(&self) -> &Name {
        &self.tag
    }

    /// All properties in declaration order.
    #[inline]
    pub fn props(&self) -> &[(Name, Prop)] {
        &self.props
    }

    /// Look up a property by key.
    pub fn prop(&self, key: &str) -> Option<&Prop> {
        self.props
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }
}

/// An immutable syntax tree.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        SyntaxTree { nodes, root }
    }

    /// The root node (usually a `Program`).
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id.
    ///
    /// Ids are only valid for the tree that produced them.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node's type tag.
    #[inline]
    pub fn tag(&self, id: NodeId) -> &Name {
        self.node(id).tag()
    }

    /// Whether the node has the given tag.
    #[inline]
    pub fn is(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).as_str() == tag
    }

    /// Look up a raw property.
    #[inline]
    pub fn prop(&self, id: NodeId, key: &str) -> Option<&Prop> {
        self.node(id).prop(key)
    }

    /// A single-child property; `None` when missing or `null`.
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match self.prop(id, key) {
            Some(Prop::Node(child)) => Some(*child),
            _ => None,
        }
    }

    /// A list-of-children property; empty when missing.
    pub fn children(&self, id: NodeId, key: &str) -> &[Option<NodeId>] {
        match self.prop(id, key) {
            Some(Prop::List(items)) => items,
            _ => &[],
        }
    }

    /// A string property.
    pub fn str_prop(&self, id: NodeId, key: &str) -> Option<&Name> {
        match self.prop(id, key) {
            Some(Prop::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// A numeric property.
    pub fn num_prop(&self, id: NodeId, key: &str) -> Option<f64> {
        match self.prop(id, key) {
            Some(Prop::Num(n)) => Some(*n),
            _ => None,
        }
    }

    /// A boolean property; missing or non-boolean reads as `false`.
    pub fn flag(&self, id: NodeId, key: &str) -> bool {
        matches!(self.prop(id, key), Some(Prop::Bool(true)))
    }

    /// The `name` of an `Identifier` node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&Name> {
        if self.is(id, kinds::IDENTIFIER) {
            self.str_prop(id, "name")
        } else {
            None
        }
    }

    /// Child nodes in traversal order.
    ///
    /// Known ESTree tags use their visitor keys; unknown tags visit every
    /// node-valued property in declaration order.
    pub fn child_nodes(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let node = self.node(id);
        let mut out = SmallVec::new();
        let mut push = |prop: &Prop| match prop {
            Prop::Node(child) => out.push(*child),
            Prop::List(items) => out.extend(items.iter().flatten().copied()),
            Prop::Str(_) | Prop::Num(_) | Prop::Bool(_) | Prop::Null => {}
        };
        match kinds::visitor_keys(node.tag()) {
            Some(keys) => {
                for key in keys {
                    if let Some(prop) = node.prop(key) {
                        push(prop);
                    }
                }
            }
            None => {
                for (_, prop) in node.props() {
                    push(prop);
                }
            }
        }
        out
    }

    /// First statement of a `Program`, `BlockStatement` or `ClassBody`,
    /// unwrapping an `ExpressionStatement` to its expression.
    pub fn first_expression(&self, id: NodeId) -> Option<NodeId> {
        let tag = self.tag(id).as_str();
        if tag != kinds::BLOCK_STATEMENT && tag != kinds::CLASS_BODY && tag != kinds::PROGRAM {
            return None;
        }
        let first = self.children(id, "body").first().copied().flatten()?;
        Some(self.child(first, "expression").unwrap_or(first))
    }

    /// Move the tree behind a shared handle.
    pub fn into_shared(self) -> SharedTree {
        SharedTree(Rc::new(self))
    }
}

/// Shared, immutable handle to a syntax tree.
///
/// Closures carry the tree their body lives in, so a closure stays callable
/// after the evaluation that created it has finished.
#[derive(Clone, Debug)]
pub struct SharedTree(Rc<SyntaxTree>);

impl SharedTree {
    /// Whether two handles point at the same tree.
    #[inline]
    pub fn ptr_eq(&self, other: &SharedTree) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedTree {
    type Target = SyntaxTree;

    #[inline]
    fn deref(&self) -> &SyntaxTree {
        &self.0
    }
}

impl From<SyntaxTree> for SharedTree {
    fn from(tree: SyntaxTree) -> Self {
        tree.into_shared()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
