//! The Conversion Engine: classifies and performs conversions the binder
//! has already sanctioned.

use crate::{error::ConversionError, types::Type, value::Value};

/// How a conversion from one type to another is classified.
///
/// `exists` is the union of `is_identity`, `is_implicit`, and `is_explicit`;
/// it is kept as its own field so callers don't have to remember to `||`
/// the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_identity: bool,
    pub is_implicit: bool,
    pub is_explicit: bool,
    pub exists: bool,
}

impl Classification {
    const NONE: Self = Self {
        is_identity: false,
        is_implicit: false,
        is_explicit: false,
        exists: false,
    };

    const fn identity() -> Self {
        Self {
            is_identity: true,
            is_implicit: false,
            is_explicit: false,
            exists: true,
        }
    }

    const fn implicit() -> Self {
        Self {
            is_identity: false,
            is_implicit: true,
            is_explicit: false,
            exists: true,
        }
    }

    const fn explicit() -> Self {
        Self {
            is_identity: false,
            is_implicit: false,
            is_explicit: true,
            exists: true,
        }
    }
}

/// Classifies a conversion from `from` to `to`.
#[must_use]
pub fn classify(from: Type, to: Type) -> Classification {
    if from == to {
        return Classification::identity();
    }
    if to == Type::Object {
        return Classification::implicit();
    }
    match (from, to) {
        // Widening numeric conversion under the arithmetic capability.
        (Type::Bool, Type::Int) => Classification::implicit(),
        // Narrowing numeric conversion.
        (Type::Int, Type::Bool) => Classification::explicit(),
        // Any-to-String and String-to-numeric are explicit only.
        (Type::Bool | Type::Int, Type::String) => Classification::explicit(),
        (Type::String, Type::Bool | Type::Int) => Classification::explicit(),
        _ => Classification::NONE,
    }
}

/// Performs a conversion `classify` reports as `exists`.
///
/// # Errors
/// Returns [`ConversionError`] when the runtime value cannot be converted —
/// this is always a value-level failure (e.g. the string `"maybe"`), never a
/// type-level one, since `classify` is consulted first for type-level
/// eligibility.
pub fn convert(to: Type, value: &Value) -> Result<Value, ConversionError> {
    match (value, to) {
        (value, Type::Object) => Ok(value.clone()),
        (Value::Bool(b), Type::Bool) => Ok(Value::Bool(*b)),
        (Value::Int(n), Type::Int) => Ok(Value::Int(*n)),
        (Value::String(s), Type::String) => Ok(Value::String(s.clone())),

        (Value::Bool(b), Type::Int) => Ok(Value::Int(i64::from(*b))),
        (Value::Int(n), Type::Bool) => Ok(Value::Bool(*n != 0)),

        (Value::Bool(true), Type::String) => Ok(Value::from("true")),
        (Value::Bool(false), Type::String) => Ok(Value::from("false")),
        (Value::Int(n), Type::String) => Ok(Value::from(n.to_string())),

        (Value::String(s), Type::Bool) => string_to_bool(s).map(Value::Bool),
        (Value::String(s), Type::Int) => string_to_bool(s).map(|b| Value::Int(i64::from(b))),

        (value, to) => Err(ConversionError::new(
            value_type(value),
            to,
            "no conversion exists between these types",
        )),
    }
}

/// The source-preserved rule: only the exact literal strings `"true"`/`"false"`
/// convert to arithmetic; anything else fails — numeric strings like `"3"`
/// are not parsed.
fn string_to_bool(s: &str) -> Result<bool, ConversionError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConversionError::new(
            Type::String,
            Type::Int,
            format!("only the literal strings \"true\" or \"false\" convert to a number, found {s:?}"),
        )),
    }
}

fn value_type(value: &Value) -> Type {
    match value {
        Value::Bool(_) => Type::Bool,
        Value::Int(_) => Type::Int,
        Value::String(_) => Type::String,
        Value::Unit => Type::Object,
    }
}
