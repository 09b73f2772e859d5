//! Unary operator implementations for the evaluator.
//!
//! `delete` needs a member reference rather than a value and is handled in
//! `exec::expr`.

use estel_runtime::{EvalError, Value};

use crate::operators::to_int32;

/// Evaluate a unary operator on an evaluated operand.
pub fn evaluate_unary(op: &str, operand: &Value) -> Result<Value, EvalError> {
    let value = match op {
        "-" => Value::Number(-operand.to_number()),
        "+" => Value::Number(operand.to_number()),
        "!" => Value::Bool(!operand.is_truthy()),
        "~" => Value::Number(f64::from(!to_int32(operand.to_number()))),
        "typeof" => Value::string(operand.type_of()),
        "void" => Value::Undefined,
        _ => return Err(EvalError::new(format!("unsupported unary operator '{op}'"))),
    };
    Ok(value)
}

/// The new value of `++`/`--`.
#[inline]
pub fn step(operand: &Value, increment: bool) -> Value {
    let n = operand.to_number();
    Value::Number(if increment { n + 1.0 } else { n - 1.0 })
}
