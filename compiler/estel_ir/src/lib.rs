//! Estel IR - syntax tree types shared by both interpreter passes.
//!
//! This crate contains:
//! - `Name`: cheap-to-clone identifier strings
//! - `SyntaxTree`: an arena of ESTree-shaped nodes addressed by `NodeId`
//! - ESTree JSON import (the exchange form produced by external parsers)
//! - Node-kind predicates used by hoisting
//! - `Walker`: tag-dispatched pre-order traversal with subtree skipping
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: nodes reference children by `NodeId`, never `Box`
//! - **Open Tags**: node kinds are tag strings, not a closed enum, so hosts can
//!   introduce new node kinds and register handlers for them
//! - **Immutable Trees**: pass annotations live in side tables, so one tree can
//!   be shared by every closure created from it

mod builder;
mod estree;
pub mod kinds;
mod name;
mod tree;
pub mod walker;

pub use builder::{LiteralValue, TreeBuilder};
pub use estree::ImportError;
pub use name::Name;
pub use tree::{Node, NodeId, Prop, SharedTree, SyntaxTree};
pub use walker::{WalkAction, WalkHandler, Walker};
