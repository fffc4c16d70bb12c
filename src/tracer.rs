//! Ambient tracing hooks.
//!
//! A trait of no-op default methods the evaluator calls at a handful of
//! points, so tracing costs nothing when nobody implements it. This crate
//! carries no `log` or `tracing` dependency — a tree-walker has no frame
//! stack worth instrumenting beyond these calls.

use std::rc::Rc;

use crate::{symbol::FunctionSymbol, value::Value};

/// Observes evaluator execution without influencing it.
///
/// Every method has a no-op default; implementors override only the hooks
/// they care about.
pub trait Tracer {
    fn on_call(&self, _function: &Rc<FunctionSymbol>, _arguments: &[Value]) {}
    fn on_return(&self, _function: &Rc<FunctionSymbol>, _value: &Value) {}
    fn on_goto(&self, _label_name: &str) {}
}

/// The default tracer: discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Writes each event to stderr, one line per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    fn on_call(&self, function: &Rc<FunctionSymbol>, arguments: &[Value]) {
        eprintln!("call {}({:?})", function.name, arguments);
    }

    fn on_return(&self, function: &Rc<FunctionSymbol>, value: &Value) {
        eprintln!("return {} -> {:?}", function.name, value);
    }

    fn on_goto(&self, label_name: &str) {
        eprintln!("goto {label_name}");
    }
}
