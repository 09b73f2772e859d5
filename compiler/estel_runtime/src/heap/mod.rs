//! Reference-counted wrappers for runtime values.
//!
//! `Heap<T>` is immutable shared data (strings, closures). `Local<T>` is
//! shared data with interior mutability (arrays, objects): every holder of
//! a clone observes writes made through any other clone.

// Rc is the implementation of Heap<T> and Local<T>
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of Heap<T> and Local<T>"
)]

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Immutable, reference-counted value.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Heap<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for Heap<str> {
    fn from(s: &str) -> Self {
        Heap(Rc::from(s))
    }
}

impl From<String> for Heap<str> {
    fn from(s: String) -> Self {
        Heap(Rc::from(s))
    }
}

/// Shared, mutable, single-threaded value.
///
/// Equality is identity: two `Local`s are equal only when they share an
/// allocation.
#[repr(transparent)]
pub struct Local<T>(Rc<RefCell<T>>);

impl<T> Local<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Local(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Borrow unless a mutable borrow is active.
    #[inline]
    pub fn try_borrow(&self) -> Option<Ref<'_, T>> {
        self.0.try_borrow().ok()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Local<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation, for identity sets.
    #[inline]
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl<T> Clone for Local<T> {
    #[inline]
    fn clone(&self) -> Self {
        Local(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Local<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Default> Default for Local<T> {
    fn default() -> Self {
        Local::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Local<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_borrow() {
            Some(inner) => fmt::Debug::fmt(&*inner, f),
            None => f.write_str("<borrowed>"),
        }
    }
}
