//! Resolved operator descriptors and their dispatch.
//!
//! Per the design notes, an operator is a tagged variant plus a dispatch
//! function keyed by `(kind, operand value)`, never a heap-allocated
//! callable — the `Value`'s own variant already encodes the runtime operand
//! type, so there is no separate operand-type parameter to thread through.

use crate::{
    error::{ArithmeticError, EvalError, StructuralError},
    types::Type,
    value::Value,
};

/// Unary operators the binder can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnaryOperatorKind {
    /// Numeric identity (`+x`).
    Identity,
    /// Numeric negation (`-x`).
    Negation,
    /// Boolean negation (`!x`).
    LogicalNot,
}

/// A unary operator resolved by the binder: the operand type it expects, the
/// type its result is declared as, and which concrete operation to run.
#[derive(Debug, Clone, Copy)]
pub struct UnaryOperator {
    pub kind: UnaryOperatorKind,
    pub operand_type: Type,
    pub result_type: Type,
}

impl UnaryOperator {
    #[must_use]
    pub fn new(kind: UnaryOperatorKind, operand_type: Type, result_type: Type) -> Self {
        Self {
            kind,
            operand_type,
            result_type,
        }
    }

    /// Applies the operator to an already-converted operand.
    ///
    /// The evaluator is responsible for converting the operand to
    /// `self.operand_type` before calling this; a mismatch here means the
    /// bound tree violated that contract.
    pub fn apply(self, value: Value) -> Result<Value, StructuralError> {
        match (self.kind, value) {
            (UnaryOperatorKind::Identity, Value::Int(n)) => Ok(Value::Int(n)),
            (UnaryOperatorKind::Negation, Value::Int(n)) => Ok(Value::Int(-n)),
            (UnaryOperatorKind::LogicalNot, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (kind, value) => Err(StructuralError::new(format!(
                "unary operator {kind} is not defined for {value:?}"
            ))),
        }
    }
}

/// Binary operators the binder can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BinaryOperatorKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOperatorKind {
    /// Whether this operator participates in the `String` promotion rule:
    /// concatenation promotes to `String` when either side already is one;
    /// no other operator does.
    #[must_use]
    pub fn is_additive(self) -> bool {
        matches!(self, Self::Add)
    }
}

/// A binary operator resolved by the binder.
///
/// `result_type` is `None` when the operator is polymorphic over numeric
/// types: the binder defers the result type to runtime promotion.
#[derive(Debug, Clone, Copy)]
pub struct BinaryOperator {
    pub kind: BinaryOperatorKind,
    pub left_type: Type,
    pub right_type: Type,
    pub result_type: Option<Type>,
}

impl BinaryOperator {
    #[must_use]
    pub fn new(kind: BinaryOperatorKind, left_type: Type, right_type: Type, result_type: Option<Type>) -> Self {
        Self {
            kind,
            left_type,
            right_type,
            result_type,
        }
    }

    /// A non-polymorphic (fixed result type) constructor, the common case
    /// for comparisons and logical operators.
    #[must_use]
    pub fn fixed(kind: BinaryOperatorKind, operand_type: Type, result_type: Type) -> Self {
        Self::new(kind, operand_type, operand_type, Some(result_type))
    }

    /// A polymorphic arithmetic operator, resolved to a result type only at
    /// runtime via [`crate::types::Type`] promotion.
    #[must_use]
    pub fn polymorphic(kind: BinaryOperatorKind, left_type: Type, right_type: Type) -> Self {
        Self::new(kind, left_type, right_type, None)
    }

    /// Applies the operator to already-converted operands.
    ///
    /// # Errors
    /// Returns [`EvalError::Arithmetic`] if `Divide` or `Modulo` is applied
    /// with a zero divisor (Rust panics on `/`/`%` by zero, so this is
    /// checked first), or [`EvalError::Structural`] if the operator isn't
    /// defined for the given operand kinds.
    pub fn apply(self, left: Value, right: Value) -> Result<Value, EvalError> {
        use BinaryOperatorKind::{
            Add, Divide, Equals, Greater, GreaterOrEquals, Less, LessOrEquals, LogicalAnd, LogicalOr, Modulo,
            Multiply, NotEquals, Subtract,
        };

        match (self.kind, left, right) {
            (Equals, l, r) => Ok(Value::Bool(l == r)),
            (NotEquals, l, r) => Ok(Value::Bool(l != r)),
            (Add, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l + r)),
            (Add, Value::String(l), Value::String(r)) => Ok(Value::String(format!("{l}{r}").into())),
            (Subtract, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l - r)),
            (Multiply, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l * r)),
            (Divide, Value::Int(_), Value::Int(0)) => {
                Err(ArithmeticError::new("division by zero").into())
            }
            (Divide, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l / r)),
            (Modulo, Value::Int(_), Value::Int(0)) => {
                Err(ArithmeticError::new("modulo by zero").into())
            }
            (Modulo, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l % r)),
            (Less, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l < r)),
            (LessOrEquals, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l <= r)),
            (Greater, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l > r)),
            (GreaterOrEquals, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l >= r)),
            (LogicalAnd, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(l && r)),
            (LogicalOr, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(l || r)),
            (kind, l, r) => Err(StructuralError::new(format!(
                "binary operator {kind} is not defined for ({l:?}, {r:?})"
            ))
            .into()),
        }
    }
}
