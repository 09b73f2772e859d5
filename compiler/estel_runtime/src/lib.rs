//! Estel runtime - values, evaluation errors, and the scope graph.
//!
//! This crate contains:
//! - `Value`: the dynamically typed runtime value, including closures
//! - `EvalError`/`ControlAction`: evaluation failures and control signals
//! - `ScopeRef`: the lexical scope graph both interpreter passes share
//!
//! All heap values are single-threaded (`Rc`), created through the factory
//! methods on `Value` and the wrappers in `heap`.

mod errors;
mod heap;
mod scope;
mod value;

pub use errors::{
    cannot_read_property, illegal_control_flow, invalid_array_length, invalid_assignment_target,
    malformed_node, not_callable, not_iterable, recursion_limit_exceeded, uncaught_exception,
    unsupported_node,
    ControlAction, EvalError, EvalErrorKind, EvalResult, StructuralError,
};
pub use heap::{Heap, Local};
pub use scope::{Reference, ScopeRef};
pub use value::{
    format_number, string_to_number, ArrayRef, ClosureKind, ClosureValue, Fields, NativeFn,
    NativeFunction, ObjectRef, Param, Value,
};
