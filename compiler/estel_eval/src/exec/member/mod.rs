//! Property access on runtime values.
//!
//! | Base | Readable properties |
//! |---|---|
//! | object | own fields |
//! | array | indices, `length` |
//! | string | indices (one character each), `length` in characters |
//! | closure | `name`, `length` (declared arity) |
//! | native function | `name` |
//!
//! Reading any other property yields `undefined`; reading or writing any
//! property of `undefined` or `null` is an error.

use estel_ir::{Name, NodeId};
use estel_runtime::{
    cannot_read_property, invalid_array_length, not_iterable, ControlAction, EvalError, ScopeRef,
    Value,
};

use crate::interpreter::Interpreter;

/// Read `key` of `base`.
pub fn get_property(base: &Value, key: &str) -> Result<Value, EvalError> {
    let value = match base {
        Value::Undefined | Value::Null => return Err(cannot_read_property(key, base)),
        Value::Object(fields) => fields.borrow().get(key).cloned().unwrap_or_default(),
        Value::Array(items) => {
            let items = items.borrow();
            if key == "length" {
                Value::Number(items.len() as f64)
            } else {
                array_index(key)
                    .and_then(|index| items.get(index).cloned())
                    .unwrap_or_default()
            }
        }
        Value::Str(s) => {
            if key == "length" {
                Value::Number(s.chars().count() as f64)
            } else {
                array_index(key)
                    .and_then(|index| s.chars().nth(index))
                    .map(|c| Value::string(c.to_string()))
                    .unwrap_or_default()
            }
        }
        Value::Closure(closure) => match key {
            "name" => Value::string(closure.display_name()),
            "length" => Value::Number(closure.arity() as f64),
            _ => Value::Undefined,
        },
        Value::Native(native) => match key {
            "name" => Value::string(native.name),
            _ => Value::Undefined,
        },
        Value::Bool(_) | Value::Number(_) => Value::Undefined,
    };
    Ok(value)
}

/// Write `key` of `base`. Writes to primitives and functions are ignored.
///
/// Arrays never grow past `max_len` elements: a `length` or an index write
/// that would exceed it fails instead of allocating.
pub fn set_property(base: &Value, key: Name, value: Value, max_len: usize) -> Result<(), EvalError> {
    match base {
        Value::Undefined | Value::Null => return Err(cannot_read_property(&key, base)),
        Value::Object(fields) => {
            fields.borrow_mut().insert(key, value);
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if key.as_str() == "length" {
                let len = value.to_number();
                if !(0.0..=max_len as f64).contains(&len) || len.fract() != 0.0 {
                    return Err(invalid_array_length(&value.to_js_string()));
                }
                items.resize(len as usize, Value::Undefined);
            } else if let Some(index) = array_index(&key) {
                let len = index
                    .checked_add(1)
                    .filter(|&len| len <= max_len)
                    .ok_or_else(|| invalid_array_length(&key))?;
                if len > items.len() {
                    items.resize(len, Value::Undefined);
                }
                items[index] = value;
            } else {
                tracing::trace!(key = %key, "ignored non-index array write");
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::Str(_) | Value::Closure(_) | Value::Native(_) => {
            tracing::trace!(key = %key, base = base.type_name(), "ignored property write");
        }
    }
    Ok(())
}

/// `delete base[key]`: removes an object field, keeping the order of the
/// rest. Returns whether the property is gone.
pub fn delete_property(base: &Value, key: &str) -> Result<bool, EvalError> {
    match base {
        Value::Undefined | Value::Null => Err(cannot_read_property(key, base)),
        Value::Object(fields) => {
            fields.borrow_mut().shift_remove(key);
            Ok(true)
        }
        Value::Array(items) => {
            if let Some(index) = array_index(key) {
                if let Some(slot) = items.borrow_mut().get_mut(index) {
                    *slot = Value::Undefined;
                }
            }
            Ok(key != "length")
        }
        _ => Ok(true),
    }
}

/// Elements of an iterable value: array elements or string characters.
///
/// Arrays are read once up front, so writes made while iterating are not
/// observed.
pub fn iterate_values(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        other => Err(not_iterable(other.type_name())),
    }
}

/// Enumerable keys for `for...in` and object spread: object field names,
/// array indices, string indices.
pub fn enumerable_keys(value: &Value) -> Vec<Name> {
    match value {
        Value::Object(fields) => fields.borrow().keys().cloned().collect(),
        Value::Array(items) => (0..items.borrow().len())
            .map(|i| Name::from(i.to_string()))
            .collect(),
        Value::Str(s) => (0..s.chars().count())
            .map(|i| Name::from(i.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Canonical array index: `"0"`, `"17"`; not `"01"`, `"-1"` or anything
/// at or above `2^32 - 1`.
fn array_index(key: &str) -> Option<usize> {
    let index = key.parse::<u32>().ok().filter(|&i| i != u32::MAX)?;
    (index.to_string() == key).then_some(index as usize)
}

impl Interpreter<'_> {
    /// Key of a `MemberExpression` (`property`) or `Property` (`key`).
    ///
    /// Computed keys are evaluated; a plain identifier is its own name;
    /// literal keys use their property-key form.
    pub fn property_key(
        &mut self,
        node: NodeId,
        key_field: &str,
        scope: &ScopeRef,
    ) -> Result<Name, ControlAction> {
        let tree = self.tree();
        let key = self.required_child(node, key_field)?;
        if !tree.flag(node, "computed") {
            if let Some(name) = tree.identifier_name(key) {
                return Ok(name.clone());
            }
        }
        Ok(self.eval(key, scope)?.to_property_key())
    }
}
