//! Estel Eval - value evaluation (pass 2) for the Estel interpreter.
//!
//! This crate walks a tree that `estel_resolve` has already linked to
//! scopes and computes values, writing the scope cells pass 1 reserved.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `ResolverRegistry`: tag-keyed table of value resolvers, open to hosts
//! - `Interpreter`: one activation (program or call) over borrowed links
//! - `Evaluator`: owns the registry, name resolver and limits
//! - `evaluate_binary`/`evaluate_unary`: operator semantics on `Value`s
//!
//! Function bodies are resolved lazily: each call runs pass 1 over the body
//! against a fresh call-scope, then evaluates it.

mod config;
mod evaluator;
pub mod exec;
pub mod interpreter;
mod operators;
mod registry;
mod unary_operators;

pub use config::{EvalConfig, DEFAULT_MAX_ARRAY_LENGTH, DEFAULT_MAX_CALL_DEPTH};
pub use evaluator::Evaluator;
pub use exec::member::{
    delete_property, enumerable_keys, get_property, iterate_values, set_property,
};
pub use exec::pattern::{Binding, Place};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use operators::evaluate_binary;
pub use registry::{ResolverRegistry, ValueResolver};
pub use unary_operators::evaluate_unary;
