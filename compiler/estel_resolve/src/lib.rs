//! Estel name resolution - pass 1 of the interpreter.
//!
//! Name resolution walks a syntax tree once and produces `ScopeLinks`:
//! the parent of every visited node, the scope every node evaluates in, and
//! the scope each declaration was hoisted into. Declarations are registered
//! in the scope graph as placeholder cells before any code runs.
//!
//! Function, arrow and class bodies are skipped. They are resolved lazily,
//! once per call, against that call's scope (`NameResolver::resolve_activation`).
//!
//! # Hoisting Rules
//!
//! | Declaration | Registered in |
//! |---|---|
//! | `var` declarator, function declaration | nearest function, class or resolution root |
//! | `let`/`const` declarator, class declaration | nearest block-like node |
//! | catch parameter | the catch body's block |
//! | import specifier | the current scope |

mod hoist;
mod links;
mod resolver;

pub use hoist::{binding_names, bubble_to_block, bubble_to_function};
pub use links::{ResolvedTree, ScopeLinks};
pub use resolver::{NameResolver, ResolveContext};
