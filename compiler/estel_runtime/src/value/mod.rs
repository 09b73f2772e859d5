//! Runtime values.
//!
//! Primitives are stored inline. Strings and closures are immutable shared
//! data (`Heap`); arrays and objects are shared mutable data (`Local`), so
//! every variable holding the same array sees the same elements.
//!
//! ```text
//! let s = Value::string("hello");
//! let arr = Value::array(vec![Value::Number(1.0)]);
//! let obj = Value::object([("someProp", Value::Number(10.0))]);
//! ```
//!
//! Equality (`PartialEq`) is strict equality: primitives compare by value,
//! composites by identity.

mod closure;
mod number;

use std::cell::RefCell;
use std::fmt;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use estel_ir::Name;
use estel_stack::ensure_sufficient_stack;

use crate::heap::{Heap, Local};

pub use closure::{ClosureKind, ClosureValue, NativeFn, NativeFunction, Param};
pub use number::{format_number, string_to_number};

/// Insertion-ordered object fields.
pub type Fields = IndexMap<Name, Value, FxBuildHasher>;

/// Shared, mutable array storage.
pub type ArrayRef = Local<Vec<Value>>;

/// Shared, mutable object storage.
pub type ObjectRef = Local<Fields>;

/// Runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// The unset placeholder and the result of a missing read.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Heap<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Closure(Heap<ClosureValue>),
    /// A function provided by the host.
    Native(NativeFunction),
}

impl Value {
    // Factory methods

    #[inline]
    pub fn string(s: impl Into<Heap<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Local::new(items))
    }

    /// A fresh object with the given fields, in order.
    pub fn object<K: Into<Name>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Local::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn empty_object() -> Self {
        Value::Object(Local::new(Fields::default()))
    }

    pub fn closure(closure: ClosureValue) -> Self {
        Value::Closure(Heap::new(closure))
    }

    pub const fn native(name: &'static str, func: NativeFn) -> Self {
        Value::Native(NativeFunction::new(name, func))
    }

    // Queries

    /// The `typeof` result.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Closure(_) | Value::Native(_) => "function",
        }
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Closure(_) | Value::Native(_) => "function",
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `undefined` or `null`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Native(_))
    }

    /// Arrays, objects and functions: values compared by identity.
    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Closure(_) | Value::Native(_)
        )
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Closure(_) | Value::Native(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    // Conversions

    /// Numeric conversion used by arithmetic.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(_) | Value::Object(_) | Value::Closure(_) | Value::Native(_) => {
                string_to_number(&self.to_js_string())
            }
        }
    }

    /// String conversion used by concatenation and template literals.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(_) => {
                let mut out = String::new();
                self.join_into(&mut out, &mut FxHashSet::default());
                out
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Closure(c) => format!("function {}() {{ [code] }}", c.display_name()),
            Value::Native(n) => format!("function {}() {{ [native code] }}", n.name),
        }
    }

    /// Append the joined form of an array element. `joining` holds the
    /// arrays currently being joined; an array nested inside itself joins
    /// as the empty string.
    fn join_into(&self, out: &mut String, joining: &mut FxHashSet<*const ()>) {
        let Value::Array(items) = self else {
            if !self.is_nullish() {
                out.push_str(&self.to_js_string());
            }
            return;
        };
        let ptr = items.as_ptr();
        if !joining.insert(ptr) {
            return;
        }
        for (i, item) in items.borrow().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            ensure_sufficient_stack(|| item.join_into(out, joining));
        }
        joining.remove(&ptr);
    }

    /// Property key form of this value.
    pub fn to_property_key(&self) -> Name {
        match self {
            Value::Str(s) => Name::new(s),
            other => Name::from(other.to_js_string()),
        }
    }

    /// Strict equality (`===`).
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Closure(a), Value::Closure(b)) => a.ptr_eq(b),
            (Value::Native(a), Value::Native(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality (`==`) for primitives; composites still compare by
    /// identity against each other.
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (a, b) if a.is_composite() && b.is_composite() => a.strict_equals(b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (a, b) if a.is_composite() || b.is_composite() => {
                let (composite, primitive) = if a.is_composite() { (a, b) } else { (b, a) };
                Value::string(composite.to_js_string()).loose_equals(primitive)
            }
            (a, b) => a.to_number() == b.to_number(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = RefCell::default();
        fmt::Debug::fmt(&DebugValue { value: self, open: &open }, f)
    }
}

/// `Debug` view of a value that prints a composite nested inside itself as
/// `<cycle>`.
struct DebugValue<'a> {
    value: &'a Value,
    open: &'a RefCell<FxHashSet<*const ()>>,
}

impl DebugValue<'_> {
    fn nested<'b>(&'b self, value: &'b Value) -> DebugValue<'b> {
        DebugValue {
            value,
            open: self.open,
        }
    }

    fn guarded(
        &self,
        f: &mut fmt::Formatter<'_>,
        ptr: *const (),
        body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        if !self.open.borrow_mut().insert(ptr) {
            return f.write_str("<cycle>");
        }
        let result = ensure_sufficient_stack(|| body(f));
        self.open.borrow_mut().remove(&ptr);
        result
    }
}

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Array(items) => self.guarded(f, items.as_ptr(), |f| match items.try_borrow() {
                Some(items) => f
                    .debug_list()
                    .entries(items.iter().map(|v| self.nested(v)))
                    .finish(),
                None => f.write_str("[<borrowed>]"),
            }),
            Value::Object(fields) => self.guarded(f, fields.as_ptr(), |f| match fields.try_borrow() {
                Some(fields) => f
                    .debug_map()
                    .entries(fields.iter().map(|(k, v)| (k.as_str(), self.nested(v))))
                    .finish(),
                None => f.write_str("{<borrowed>}"),
            }),
            Value::Closure(c) => write!(f, "<closure {}>", c.display_name()),
            Value::Native(n) => write!(f, "{n:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}
