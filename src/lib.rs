//! `vivian_core`: the bound IR, tree-walking evaluator, and pretty-printer
//! for the Vivian scripting language's back end.
//!
//! This crate has no parser or binder — programs are built directly through
//! [`bound::BoundProgram`]'s own constructors, the way an external binder
//! would, and evaluated with [`evaluator::Evaluator`] or rendered with
//! [`printer::write_to`].

pub mod bound;
pub mod builtins;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod operators;
pub mod printer;
pub mod symbol;
pub mod tracer;
pub mod types;
pub mod value;

pub use bound::{BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement, LiteralValue};
pub use error::{ArithmeticError, ConversionError, EvalError, HostIoError, PrintError, StructuralError};
pub use evaluator::{Evaluator, Scopes};
pub use symbol::{BoundLabel, FunctionSymbol, VariableSymbol};
pub use types::Type;
pub use value::Value;
