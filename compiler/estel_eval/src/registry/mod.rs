//! Tag-keyed table of value resolvers.
//!
//! Every node kind the evaluator understands has one resolver here. Hosts
//! add resolvers for new node kinds, or replace the defaults, with
//! [`ResolverRegistry::register`]. A tag without a resolver is an
//! unsupported construct.

use rustc_hash::FxHashMap;

use estel_ir::{Name, NodeId};
use estel_runtime::{EvalResult, ScopeRef};

use crate::exec::{control, expr};
use crate::interpreter::Interpreter;

/// Computes the value of one node in a scope.
pub type ValueResolver = fn(&mut Interpreter<'_>, NodeId, &ScopeRef) -> EvalResult;

/// Value resolvers keyed by node tag.
#[derive(Clone)]
pub struct ResolverRegistry {
    by_tag: FxHashMap<Name, ValueResolver>,
}

impl ResolverRegistry {
    /// A registry holding the default resolvers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_defaults();
        registry
    }

    /// A registry with no resolvers at all.
    pub fn empty() -> Self {
        ResolverRegistry {
            by_tag: FxHashMap::default(),
        }
    }

    /// Register `resolver` for `tag`, returning the resolver it replaces.
    pub fn register(
        &mut self,
        tag: impl Into<Name>,
        resolver: ValueResolver,
    ) -> Option<ValueResolver> {
        self.by_tag.insert(tag.into(), resolver)
    }

    #[must_use]
    pub fn with(mut self, tag: impl Into<Name>, resolver: ValueResolver) -> Self {
        self.register(tag, resolver);
        self
    }

    pub fn remove(&mut self, tag: &str) -> Option<ValueResolver> {
        self.by_tag.remove(tag)
    }

    #[inline]
    pub fn get(&self, tag: &str) -> Option<ValueResolver> {
        self.by_tag.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    fn register_defaults(&mut self) {
        const DEFAULTS: &[(&str, ValueResolver)] = &[
            // Expressions
            ("Identifier", expr::identifier),
            ("Literal", expr::literal),
            ("ThisExpression", expr::this_expression),
            ("TemplateLiteral", expr::template_literal),
            ("ArrayExpression", expr::array_expression),
            ("ObjectExpression", expr::object_expression),
            ("FunctionExpression", expr::function_expression),
            ("ArrowFunctionExpression", expr::function_expression),
            ("MemberExpression", expr::member_expression),
            ("ChainExpression", expr::chain_expression),
            ("CallExpression", expr::call_expression),
            ("UnaryExpression", expr::unary_expression),
            ("UpdateExpression", expr::update_expression),
            ("BinaryExpression", expr::binary_expression),
            ("LogicalExpression", expr::logical_expression),
            ("AssignmentExpression", expr::assignment_expression),
            ("ConditionalExpression", expr::conditional_expression),
            ("SequenceExpression", expr::sequence_expression),
            // Statements
            ("Program", control::program),
            ("BlockStatement", control::block_statement),
            ("ExpressionStatement", control::expression_statement),
            ("EmptyStatement", control::empty_statement),
            ("DebuggerStatement", control::empty_statement),
            ("ImportDeclaration", control::empty_statement),
            ("FunctionDeclaration", control::empty_statement),
            ("VariableDeclaration", control::variable_declaration),
            ("IfStatement", control::if_statement),
            ("ForStatement", control::for_statement),
            ("ForInStatement", control::for_in_statement),
            ("ForOfStatement", control::for_of_statement),
            ("WhileStatement", control::while_statement),
            ("DoWhileStatement", control::do_while_statement),
            ("SwitchStatement", control::switch_statement),
            ("BreakStatement", control::break_statement),
            ("ContinueStatement", control::continue_statement),
            ("ReturnStatement", control::return_statement),
            ("ThrowStatement", control::throw_statement),
            ("TryStatement", control::try_statement),
        ];
        for &(tag, resolver) in DEFAULTS {
            self.register(tag, resolver);
        }
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
