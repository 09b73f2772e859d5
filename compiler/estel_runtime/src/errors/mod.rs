//! Error types for name resolution and evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries typed data for each failure; its `Display` impl
//! produces the message. Factory functions (e.g. `unsupported_node()`) are
//! the public API and populate both `kind` and `message`.
//!
//! # Control Flow
//!
//! `return`, `break`, `continue` and `throw` are not errors, but they unwind
//! the evaluator the same way. `ControlAction` carries them alongside real
//! errors so every resolver can propagate all of them with `?`.

use std::fmt;

use estel_ir::NodeId;

use crate::value::Value;

/// Result of evaluating one node.
pub type EvalResult = Result<Value, ControlAction>;

/// Structural invariant violations in the scope graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// Attaching a scope beneath itself or one of its descendants.
    #[error("attaching this scope would create a cycle in the scope tree")]
    ScopeCycle,
    /// Name resolution was started with a root scope that already belongs
    /// to a syntax node.
    #[error("root scope is already bound to node {owner}")]
    RootScopeAlreadyBound { owner: NodeId },
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// No value resolver is registered for a node tag.
    UnsupportedNode { tag: String },
    /// Calling something that is not a function.
    NotCallable { type_name: String },
    /// Spreading or `for...of` over a value with no elements.
    NotIterable { type_name: String },
    /// Reading or writing a property of `undefined`/`null`.
    CannotReadProperty { property: String, base: String },
    /// Assigning to something that is not a reference.
    InvalidAssignmentTarget { tag: String },
    /// Interpreted recursion exceeded the configured depth.
    StackOverflow { depth: usize },
    /// An array length or index outside what arrays may hold.
    InvalidArrayLength { length: String },
    /// A `throw` nobody caught. Holds the thrown value's string form.
    UncaughtException { value: String },
    /// A node is missing a property its tag requires.
    MalformedNode { tag: String, detail: String },
    /// `return`, `break` or `continue` outside a construct that handles it.
    IllegalControlFlow { keyword: String },
    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedNode { tag } => write!(f, "unsupported node type: {tag}"),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not a function"),
            Self::NotIterable { type_name } => write!(f, "{type_name} is not iterable"),
            Self::CannotReadProperty { property, base } => {
                write!(f, "cannot read property '{property}' of {base}")
            }
            Self::InvalidAssignmentTarget { tag } => {
                write!(f, "invalid assignment target: {tag}")
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::InvalidArrayLength { length } => write!(f, "invalid array length: {length}"),
            Self::UncaughtException { value } => write!(f, "uncaught exception: {value}"),
            Self::MalformedNode { tag, detail } => write!(f, "malformed {tag}: {detail}"),
            Self::IllegalControlFlow { keyword } => write!(f, "illegal {keyword} statement"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Node the error was raised at.
    pub node: Option<NodeId>,
    /// The thrown value, for `UncaughtException`.
    pub thrown: Option<Value>,
}

impl EvalError {
    /// Create an error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            node: None,
            thrown: None,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            node: None,
            thrown: None,
        }
    }

    /// Attach the node the error was raised at, keeping an existing one.
    #[must_use]
    pub fn at(mut self, node: NodeId) -> Self {
        self.node.get_or_insert(node);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(node) = self.node {
            write!(f, " (at node {node})")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

/// Non-local exit from an evaluation.
#[derive(Clone, Debug)]
pub enum ControlAction {
    Error(Box<EvalError>),
    /// `return` with its value.
    Return(Value),
    Break,
    Continue,
    /// `throw` with the thrown value.
    Throw(Value),
}

impl ControlAction {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    /// Attach a node to an `Error`; other actions pass through.
    #[must_use]
    pub fn at(self, node: NodeId) -> Self {
        match self {
            ControlAction::Error(e) => ControlAction::Error(Box::new(e.at(node))),
            other => other,
        }
    }

    /// Convert an action that escaped every handler into an error.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            ControlAction::Error(e) => *e,
            ControlAction::Throw(value) => uncaught_exception(value),
            ControlAction::Return(_) => illegal_control_flow("return"),
            ControlAction::Break => illegal_control_flow("break"),
            ControlAction::Continue => illegal_control_flow("continue"),
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

// Factory functions

/// No resolver for a node tag.
#[cold]
pub fn unsupported_node(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedNode {
        tag: tag.to_string(),
    })
}

/// Value is not callable.
#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Value cannot be iterated.
#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

/// Property access on `undefined` or `null`.
#[cold]
pub fn cannot_read_property(property: &str, base: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotReadProperty {
        property: property.to_string(),
        base: base.type_name().to_string(),
    })
}

/// Invalid assignment target.
#[cold]
pub fn invalid_assignment_target(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
        tag: tag.to_string(),
    })
}

/// Maximum call depth exceeded.
#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

/// Array length or index beyond the configured bound, negative, or not an
/// integer.
#[cold]
pub fn invalid_array_length(length: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArrayLength {
        length: length.to_string(),
    })
}

/// A thrown value reached the top level.
#[cold]
pub fn uncaught_exception(value: Value) -> EvalError {
    let mut err = EvalError::from_kind(EvalErrorKind::UncaughtException {
        value: value.to_js_string(),
    });
    err.thrown = Some(value);
    err
}

/// A node lacks a required property.
#[cold]
pub fn malformed_node(tag: &str, detail: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedNode {
        tag: tag.to_string(),
        detail: detail.into(),
    })
}

/// `return`/`break`/`continue` with nothing to receive it.
#[cold]
pub fn illegal_control_flow(keyword: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IllegalControlFlow {
        keyword: keyword.to_string(),
    })
}
