//! Execution modules for the Estel interpreter.
//!
//! - `expr`: expression resolvers (literals, operators, members, calls)
//! - `control`: statement resolvers (blocks, declarations, loops, `try`)
//! - `pattern`: assignment targets and destructuring
//! - `member`: property reads and writes on runtime values
//!
//! The resolvers in `expr` and `control` are the default entries of the
//! `ResolverRegistry`.

pub mod control;
pub mod expr;
pub mod member;
pub mod pattern;
