//! Error model.
//!
//! Four failure kinds, kept distinct so callers can tell a binder-contract
//! violation apart from a runtime conversion failure apart from a host I/O
//! failure apart from a zero-divisor arithmetic failure, rather than
//! string-matching one flat error type. Plain `Display` +
//! `std::error::Error` enums with `From` impls per stage, no `thiserror`.

use std::fmt;

use crate::types::Type;

/// The bound tree violated an invariant the binder should have prevented:
/// an unknown node kind, a missing label, a missing variable binding, or an
/// `Error` placeholder node reached at runtime. Fatal; there is no recovery
/// inside the evaluator or printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError(String);

impl StructuralError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "structural error: {}", self.0)
    }
}

impl std::error::Error for StructuralError {}

/// A runtime conversion the binder accepted could not be realized for the
/// actual value (e.g. converting the string `"maybe"` to an arithmetic
/// type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub from: Type,
    pub to: Type,
    pub detail: String,
}

impl ConversionError {
    pub fn new(from: Type, to: Type, detail: impl Into<String>) -> Self {
        Self {
            from,
            to,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert {} to {}: {}", self.from, self.to, self.detail)
    }
}

impl std::error::Error for ConversionError {}

/// A binary arithmetic operator (`/`, `%`) was applied to a runtime-zero
/// divisor. Division and modulo by zero panic unconditionally in Rust, so
/// this is caught before reaching `/`/`%` rather than letting the process
/// crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticError(String);

impl ArithmeticError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arithmetic error: {}", self.0)
    }
}

impl std::error::Error for ArithmeticError {}

/// A built-in's underlying I/O failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIoError(String);

impl HostIoError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HostIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host I/O error: {}", self.0)
    }
}

impl std::error::Error for HostIoError {}

/// Unified evaluator failure. The object language has no exceptions, so any
/// of these aborts the current evaluation and surfaces verbatim to the
/// caller — there is no recovery or retry inside the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    Structural(StructuralError),
    Conversion(ConversionError),
    HostIo(HostIoError),
    Arithmetic(ArithmeticError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural(e) => write!(f, "{e}"),
            Self::Conversion(e) => write!(f, "{e}"),
            Self::HostIo(e) => write!(f, "{e}"),
            Self::Arithmetic(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<StructuralError> for EvalError {
    fn from(e: StructuralError) -> Self {
        Self::Structural(e)
    }
}

impl From<ConversionError> for EvalError {
    fn from(e: ConversionError) -> Self {
        Self::Conversion(e)
    }
}

impl From<HostIoError> for EvalError {
    fn from(e: HostIoError) -> Self {
        Self::HostIo(e)
    }
}

impl From<ArithmeticError> for EvalError {
    fn from(e: ArithmeticError) -> Self {
        Self::Arithmetic(e)
    }
}

/// The pretty-printer only ever raises a structural error (unknown node kind
/// or unknown literal type); it never touches conversion or host I/O.
pub type PrintError = StructuralError;
