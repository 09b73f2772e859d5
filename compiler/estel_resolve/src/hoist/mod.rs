//! Hoisting helpers: where a declaration lands.

use smallvec::SmallVec;

use estel_ir::kinds;
use estel_ir::{Name, NodeId, SyntaxTree};
use estel_runtime::ScopeRef;

use crate::links::ScopeLinks;

/// The scope a function-scoped declaration made from `scope` lands in.
///
/// Starts at the node owning `scope` and follows parent links up to the
/// nearest function or class node, or the resolution root, and returns that
/// node's scope. A scope with no owner in these links is its own target.
pub fn bubble_to_function(tree: &SyntaxTree, links: &ScopeLinks, scope: &ScopeRef) -> ScopeRef {
    let Some(mut node) = scope.owner().filter(|&owner| links.contains(owner)) else {
        return scope.clone();
    };
    loop {
        let tag = tree.tag(node);
        if node == links.root() || kinds::is_function_tag(tag) || kinds::is_class_tag(tag) {
            return links.scope_or_root(node);
        }
        match links.parent(node) {
            Some(parent) => node = parent,
            None => return links.scope_or_root(node),
        }
    }
}

/// The nearest strict ancestor of `node` that is block-like, or the
/// resolution root.
pub fn bubble_to_block(tree: &SyntaxTree, links: &ScopeLinks, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = links.parent(current) {
        if parent == links.root() || kinds::is_block_tag(tree.tag(parent)) {
            return parent;
        }
        current = parent;
    }
    current
}

/// Names bound by a declaration target: an identifier or a destructuring
/// pattern, in source order.
pub fn binding_names(tree: &SyntaxTree, pattern: NodeId) -> SmallVec<[Name; 2]> {
    let mut names = SmallVec::new();
    collect_names(tree, pattern, &mut names);
    names
}

fn collect_names(tree: &SyntaxTree, pattern: NodeId, out: &mut SmallVec<[Name; 2]>) {
    match tree.tag(pattern).as_str() {
        kinds::IDENTIFIER => {
            if let Some(name) = tree.identifier_name(pattern) {
                out.push(name.clone());
            }
        }
        kinds::OBJECT_PATTERN => {
            for property in tree.children(pattern, "properties").iter().flatten() {
                let target = if tree.is(*property, kinds::PROPERTY) {
                    tree.child(*property, "value")
                } else {
                    Some(*property)
                };
                if let Some(target) = target {
                    collect_names(tree, target, out);
                }
            }
        }
        kinds::ARRAY_PATTERN => {
            for element in tree.children(pattern, "elements").iter().flatten() {
                collect_names(tree, *element, out);
            }
        }
        kinds::ASSIGNMENT_PATTERN => {
            if let Some(left) = tree.child(pattern, "left") {
                collect_names(tree, left, out);
            }
        }
        kinds::REST_ELEMENT => {
            if let Some(argument) = tree.child(pattern, "argument") {
                collect_names(tree, argument, out);
            }
        }
        _ => {}
    }
}
