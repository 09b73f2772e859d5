//! Binary operator implementations for the evaluator.
//!
//! Operators are keyed by their ESTree `operator` string and dispatched with
//! a plain `match`. Short-circuit operators (`&&`, `||`, `??`) need the
//! evaluator and live in `exec::expr`.
//!
//! # Coercion for `+`
//!
//! | Operands | Result |
//! |---|---|
//! | number + number | numeric addition |
//! | either side a string | concatenation of both string forms |
//! | array, object or function | converted to its string form first, then concatenated |
//! | anything else | numeric addition after `to_number` |

use std::cmp::Ordering;

use estel_runtime::{EvalError, Value};

/// Evaluate a binary operator on two evaluated operands.
pub fn evaluate_binary(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let value = match op {
        "+" => add(left, right),
        "-" => Value::Number(left.to_number() - right.to_number()),
        "*" => Value::Number(left.to_number() * right.to_number()),
        "/" => Value::Number(left.to_number() / right.to_number()),
        "%" => Value::Number(left.to_number() % right.to_number()),
        "**" => Value::Number(power(left.to_number(), right.to_number())),
        "==" => Value::Bool(left.loose_equals(right)),
        "!=" => Value::Bool(!left.loose_equals(right)),
        "===" => Value::Bool(left.strict_equals(right)),
        "!==" => Value::Bool(!left.strict_equals(right)),
        "<" => Value::Bool(compare(left, right).is_some_and(Ordering::is_lt)),
        ">" => Value::Bool(compare(left, right).is_some_and(Ordering::is_gt)),
        "<=" => Value::Bool(compare(left, right).is_some_and(Ordering::is_le)),
        ">=" => Value::Bool(compare(left, right).is_some_and(Ordering::is_ge)),
        "&" => int_op(left, right, |a, b| a & b),
        "|" => int_op(left, right, |a, b| a | b),
        "^" => int_op(left, right, |a, b| a ^ b),
        "<<" => int_op(left, right, |a, b| a.wrapping_shl(b as u32 & 31)),
        ">>" => int_op(left, right, |a, b| a >> (b as u32 & 31)),
        ">>>" => {
            let shift = to_uint32(right.to_number()) & 31;
            Value::Number(f64::from(to_uint32(left.to_number()) >> shift))
        }
        "in" => Value::Bool(has_property(right, left)?),
        _ => return Err(EvalError::new(format!("unsupported binary operator '{op}'"))),
    };
    Ok(value)
}

/// `+` with the coercion table above.
pub fn add(left: &Value, right: &Value) -> Value {
    if let (Value::Number(a), Value::Number(b)) = (left, right) {
        return Value::Number(a + b);
    }
    let left = to_primitive(left);
    let right = to_primitive(right);
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let mut joined = left.to_js_string();
        joined.push_str(&right.to_js_string());
        Value::string(joined)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Relational comparison. `None` when either side converts to `NaN`.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let left = to_primitive(left);
    let right = to_primitive(right);
    match (&left, &right) {
        (Value::Str(a), Value::Str(b)) => Some((**a).cmp(&**b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

/// Composites become their string form; primitives are unchanged.
fn to_primitive(value: &Value) -> Value {
    if value.is_composite() {
        Value::string(value.to_js_string())
    } else {
        value.clone()
    }
}

fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}

fn int_op(left: &Value, right: &Value, op: fn(i32, i32) -> i32) -> Value {
    let result = op(to_int32(left.to_number()), to_int32(right.to_number()));
    Value::Number(f64::from(result))
}

/// 32-bit signed conversion used by bitwise operators.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// 32-bit unsigned conversion: truncate, then wrap modulo 2^32.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// `key in target`.
fn has_property(target: &Value, key: &Value) -> Result<bool, EvalError> {
    let key = key.to_property_key();
    match target {
        Value::Object(fields) => Ok(fields.borrow().contains_key(&key)),
        Value::Array(items) => Ok(key.as_str() == "length"
            || key
                .parse::<usize>()
                .is_ok_and(|index| index < items.borrow().len())),
        Value::Closure(_) | Value::Native(_) => Ok(matches!(key.as_str(), "name" | "length")),
        other => Err(EvalError::new(format!(
            "cannot use 'in' to search for '{key}' in {}",
            other.type_name()
        ))),
    }
}
