//! Programmatic tree construction.

use smallvec::SmallVec;

use crate::kinds;
use crate::tree::{Node, NodeId, Prop, SyntaxTree};
use crate::Name;

/// Scalar value accepted by [`TreeBuilder::create_literal`].
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::Str(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::Str(s)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Num(n)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        LiteralValue::Num(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

/// Builds a `SyntaxTree` bottom-up: children are added before their parents.
///
/// ```text
/// let mut b = TreeBuilder::new();
/// let x = b.create_identifier("x");
/// let stmt = b.add("ExpressionStatement", [("expression", Prop::Node(x))]);
/// let program = b.add("Program", [("body", Prop::List(vec![Some(stmt)]))]);
/// let tree = b.finish(program);
/// ```
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    pub fn add<'k>(
        &mut self,
        tag: impl Into<Name>,
        props: impl IntoIterator<Item = (&'k str, Prop)>,
    ) -> NodeId {
        let props: SmallVec<[(Name, Prop); 4]> =
            props.into_iter().map(|(k, v)| (Name::new(k), v)).collect();
        self.push(Node::new(tag.into(), props))
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append an `Identifier` node.
    pub fn create_identifier(&mut self, name: &str) -> NodeId {
        self.add(
            kinds::IDENTIFIER,
            [("name", Prop::Str(Name::new(name)))],
        )
    }

    /// Append a `Literal` node for a string, boolean or finite number.
    ///
    /// Returns `None` (and adds nothing) for `NaN` and infinities, which have
    /// no literal form.
    pub fn create_literal(&mut self, value: impl Into<LiteralValue>) -> Option<NodeId> {
        let (value, raw) = match value.into() {
            LiteralValue::Str(s) => {
                let raw = format!("\"{s}\"");
                (Prop::Str(Name::from(s)), raw)
            }
            LiteralValue::Num(n) if n.is_finite() => (Prop::Num(n), n.to_string()),
            LiteralValue::Num(_) => return None,
            LiteralValue::Bool(b) => (Prop::Bool(b), b.to_string()),
        };
        Some(self.add(
            kinds::LITERAL,
            [("value", value), ("raw", Prop::Str(Name::from(raw)))],
        ))
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finish the tree with `root` as its root node.
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree::from_parts(self.nodes, root)
    }
}
