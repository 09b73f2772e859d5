//! Lexical scope graph.
//!
//! A scope is a node in a rooted tree holding named reference cells. Both
//! passes share it: name resolution declares cells at their hoisted
//! positions, evaluation reads and writes them, and closures keep the scope
//! they were created in.
//!
//! # Ownership
//!
//! The parent link is the owning edge; the child list holds `Weak` handles.
//! A scope therefore lives exactly as long as something reachable holds it
//! (the resolved tree's links, a running call, or a closure that captured
//! it or one of its descendants). A call-scope outlives its call while a
//! closure created in it is alive, and is dropped with that closure.
//!
//! None of the lookup operations fail: absence is `None` (or `false`), which
//! is distinct from a declared cell holding the `Undefined` placeholder.

// Rc is the implementation of ScopeRef
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of ScopeRef"
)]

use std::cell::RefCell;
use std::fmt;
use std::iter;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use estel_ir::{Name, NodeId};

use crate::errors::StructuralError;
use crate::value::Value;

/// One scope's state. Accessed through `ScopeRef`.
#[derive(Default)]
struct Scope {
    name: Option<Name>,
    /// Reference cells in declaration order.
    bindings: IndexMap<Name, Value, FxBuildHasher>,
    parent: Option<ScopeRef>,
    children: Vec<WeakScope>,
    /// The syntax node this scope belongs to.
    owner: Option<NodeId>,
    /// Holds its own `this`/`arguments` (an ordinary function call-scope).
    dynamic_context: bool,
}

/// Shared handle to a scope.
#[derive(Clone)]
#[repr(transparent)]
pub struct ScopeRef(Rc<RefCell<Scope>>);

/// Non-owning handle to a scope, held by its parent's child list.
#[derive(Clone)]
pub(crate) struct WeakScope(Weak<RefCell<Scope>>);

impl WeakScope {
    #[inline]
    pub(crate) fn upgrade(&self) -> Option<ScopeRef> {
        self.0.upgrade().map(ScopeRef)
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for WeakScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(scope) => write!(f, "Weak({scope:?})"),
            None => f.write_str("Weak(<dropped>)"),
        }
    }
}

/// Result of a successful lookup: the owning scope and the cell's value.
#[derive(Clone, Debug)]
pub struct Reference {
    pub scope: ScopeRef,
    pub name: Name,
    pub value: Value,
}

impl Reference {
    /// Write through to the referenced cell.
    pub fn set(&self, value: Value) -> Value {
        self.scope.declare_own(self.name.clone(), Some(value))
    }

    /// Re-read the referenced cell.
    pub fn get(&self) -> Option<Value> {
        self.scope.get_own(&self.name)
    }
}

impl ScopeRef {
    fn from_scope(scope: Scope) -> Self {
        ScopeRef(Rc::new(RefCell::new(scope)))
    }

    /// A new parentless, anonymous scope.
    pub fn root() -> Self {
        Self::from_scope(Scope::default())
    }

    /// A new parentless scope with a display name.
    pub fn named(name: impl Into<Name>) -> Self {
        Self::from_scope(Scope {
            name: Some(name.into()),
            ..Scope::default()
        })
    }

    pub(crate) fn downgrade(&self) -> WeakScope {
        WeakScope(Rc::downgrade(&self.0))
    }

    /// Whether both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &ScopeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // Structure

    /// Create a fresh scope attached beneath this one.
    pub fn new_child(&self) -> ScopeRef {
        let child = Self::from_scope(Scope {
            parent: Some(self.clone()),
            ..Scope::default()
        });
        let mut inner = self.0.borrow_mut();
        inner.children.retain(WeakScope::is_live);
        inner.children.push(child.downgrade());
        child
    }

    /// Re-parent `child` beneath this scope, detaching it from its previous
    /// parent. Returns `Ok(false)` if it already was a child of this scope.
    pub fn attach_child(&self, child: &ScopeRef) -> Result<bool, StructuralError> {
        if child.ptr_eq(self) || self.ancestors().any(|a| a.ptr_eq(child)) {
            return Err(StructuralError::ScopeCycle);
        }
        if let Some(previous) = child.parent() {
            if previous.ptr_eq(self) {
                return Ok(false);
            }
            previous.detach_child(child);
        }
        child.0.borrow_mut().parent = Some(self.clone());
        let mut inner = self.0.borrow_mut();
        inner.children.retain(WeakScope::is_live);
        inner.children.push(child.downgrade());
        Ok(true)
    }

    /// Detach `child` from this scope. The child becomes a root.
    pub fn detach_child(&self, child: &ScopeRef) -> bool {
        let position = self
            .0
            .borrow()
            .children
            .iter()
            .position(|w| w.upgrade().is_some_and(|c| c.ptr_eq(child)));
        let Some(position) = position else {
            return false;
        };
        self.0.borrow_mut().children.remove(position);
        child.0.borrow_mut().parent = None;
        true
    }

    pub fn has_child(&self, child: &ScopeRef) -> bool {
        child.parent().is_some_and(|p| p.ptr_eq(self))
    }

    /// Live children in attachment order.
    pub fn children(&self) -> Vec<ScopeRef> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(WeakScope::upgrade)
            .collect()
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.0.borrow().parent.clone()
    }

    /// This scope followed by its ancestors up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = ScopeRef> {
        iter::successors(Some(self.clone()), ScopeRef::parent)
    }

    /// Number of ancestors (a root has depth 0).
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    // Own cells

    /// Create or overwrite this scope's own cell and return the stored
    /// value. `None` stores the `Undefined` placeholder. Overwriting keeps
    /// the cell's position.
    pub fn declare_own(&self, name: impl Into<Name>, value: Option<Value>) -> Value {
        let value = value.unwrap_or_default();
        self.0
            .borrow_mut()
            .bindings
            .insert(name.into(), value.clone());
        value
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Remove this scope's own cell. Ancestors are untouched.
    pub fn remove_own(&self, name: &str) -> bool {
        self.0.borrow_mut().bindings.shift_remove(name).is_some()
    }

    /// Own names in declaration order.
    pub fn own_names(&self) -> Vec<Name> {
        self.0.borrow().bindings.keys().cloned().collect()
    }

    pub fn count_own(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    // Lexical lookup

    /// Find the nearest scope (self included) owning `name`.
    pub fn resolve(&self, name: &str) -> Option<Reference> {
        self.ancestors().find_map(|scope| {
            let (key, value) = {
                let inner = scope.0.borrow();
                let (key, value) = inner.bindings.get_key_value(name)?;
                (key.clone(), value.clone())
            };
            Some(Reference {
                scope,
                name: key,
                value,
            })
        })
    }

    /// The nearest cell's value.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.resolve(name).map(|r| r.value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.ancestors().any(|scope| scope.has_own(name))
    }

    /// Write the nearest cell; declare in this scope when no ancestor owns
    /// `name`. Returns the stored value.
    pub fn set(&self, name: impl Into<Name>, value: Value) -> Value {
        let name = name.into();
        match self.ancestors().find(|scope| scope.has_own(&name)) {
            Some(owner) => owner.declare_own(name, Some(value)),
            None => {
                tracing::debug!(name = %name, "implicit binding of undeclared name");
                self.declare_own(name, Some(value))
            }
        }
    }

    /// Remove the nearest owner's cell.
    pub fn remove_nearest(&self, name: &str) -> bool {
        self.ancestors().any(|scope| scope.remove_own(name))
    }

    /// Remove `name` from every scope on the lexical chain, returning how
    /// many scopes lost it.
    pub fn remove_all(&self, name: &str) -> usize {
        self.ancestors().filter(|scope| scope.remove_own(name)).count()
    }

    /// Names visible from here, innermost scope first. Shadowed names are
    /// listed once per declaring scope.
    pub fn all_names(&self) -> Vec<Name> {
        self.ancestors()
            .flat_map(|scope| scope.own_names())
            .collect()
    }

    /// Number of distinct names visible from here.
    pub fn count_reachable(&self) -> usize {
        let mut seen = FxHashSet::default();
        for scope in self.ancestors() {
            seen.extend(scope.0.borrow().bindings.keys().cloned());
        }
        seen.len()
    }

    // Dynamic context

    /// Mark this scope as holding its own `this` and `arguments`.
    pub fn mark_dynamic_context(&self) {
        self.0.borrow_mut().dynamic_context = true;
    }

    pub fn is_dynamic_context_owner(&self) -> bool {
        self.0.borrow().dynamic_context
    }

    /// The nearest dynamic-context owner on the lexical chain, self included.
    pub fn nearest_dynamic_context(&self) -> Option<ScopeRef> {
        self.ancestors().find(ScopeRef::is_dynamic_context_owner)
    }

    // Metadata

    pub fn name(&self) -> Option<Name> {
        self.0.borrow().name.clone()
    }

    pub fn set_name(&self, name: Option<Name>) {
        self.0.borrow_mut().name = name;
    }

    /// The syntax node this scope belongs to.
    pub fn owner(&self) -> Option<NodeId> {
        self.0.borrow().owner
    }

    pub fn set_owner(&self, owner: Option<NodeId>) {
        self.0.borrow_mut().owner = owner;
    }
}

impl PartialEq for ScopeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(inner) = self.0.try_borrow() else {
            return f.write_str("Scope(<borrowed>)");
        };
        f.debug_struct("Scope")
            .field("name", &inner.name)
            .field("owner", &inner.owner)
            .field("names", &inner.bindings.keys().collect::<Vec<_>>())
            .field("dynamic_context", &inner.dynamic_context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
