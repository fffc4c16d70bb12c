//! Built-in functions: `print`, `input`, `rnd`.
//!
//! A built-in is a function symbol plus a closure-free handler looked up by
//! identity, not name. Resources it needs are built lazily — the PRNG is
//! constructed on first use, not up front.

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    error::{EvalError, HostIoError, StructuralError},
    io::{InputReader, PrintWriter},
    symbol::{FunctionSymbol, VariableSymbol},
    types::Type,
    value::Value,
};

/// The canonical signatures for every built-in, resolved once and compared
/// by symbol identity thereafter: built-ins are resolved by symbol identity,
/// not name, at call sites.
///
/// A real binder would resolve these once per compilation and hand the same
/// `Rc`s to every bound program it produces; [`BuiltinFunctions::canonical`]
/// stands in for that — every caller in this process observes the same
/// three symbols.
#[derive(Clone)]
pub struct BuiltinFunctions {
    pub print: Rc<FunctionSymbol>,
    pub input: Rc<FunctionSymbol>,
    pub rnd: Rc<FunctionSymbol>,
}

impl BuiltinFunctions {
    fn fresh() -> Self {
        Self {
            print: Rc::new(FunctionSymbol::new(
                "print",
                vec![Rc::new(VariableSymbol::new_parameter("value", Type::Object))],
                Type::Object,
            )),
            input: Rc::new(FunctionSymbol::new("input", Vec::new(), Type::String)),
            rnd: Rc::new(FunctionSymbol::new(
                "rnd",
                vec![Rc::new(VariableSymbol::new_parameter("max", Type::Int))],
                Type::Int,
            )),
        }
    }

    /// The process-wide canonical set of builtin symbols.
    #[must_use]
    pub fn canonical() -> Self {
        thread_local! {
            static CANONICAL: BuiltinFunctions = BuiltinFunctions::fresh();
        }
        CANONICAL.with(Clone::clone)
    }

    /// Whether `function` is one of these three canonical symbols.
    #[must_use]
    pub fn is_builtin(&self, function: &Rc<FunctionSymbol>) -> bool {
        Rc::ptr_eq(function, &self.print) || Rc::ptr_eq(function, &self.input) || Rc::ptr_eq(function, &self.rnd)
    }
}

impl Default for BuiltinFunctions {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Runtime state a built-in needs beyond its arguments: the output sink, the
/// input source, and the lazily-seeded PRNG `rnd` draws from.
pub struct BuiltinContext<'a> {
    pub print: &'a mut dyn PrintWriter,
    pub input: &'a mut dyn InputReader,
    rng: Option<ChaCha8Rng>,
    rng_seed: Option<u64>,
}

impl<'a> BuiltinContext<'a> {
    #[must_use]
    pub fn new(print: &'a mut dyn PrintWriter, input: &'a mut dyn InputReader) -> Self {
        Self {
            print,
            input,
            rng: None,
            rng_seed: None,
        }
    }

    /// Pins the PRNG to a fixed seed, for deterministic tests. Must be
    /// called before the first call to `rnd`; the PRNG is constructed once
    /// and reused for the lifetime of this context.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn rng(&mut self) -> &mut ChaCha8Rng {
        self.rng.get_or_insert_with(|| match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        })
    }
}

/// Invokes a builtin identified by its canonical symbol.
///
/// # Errors
/// Propagates `print`/`input` I/O failures and structural errors (e.g.
/// `rnd`'s `max` argument not being positive, or being called with an
/// unrecognized symbol).
pub fn call(
    builtins: &BuiltinFunctions,
    function: &Rc<FunctionSymbol>,
    arguments: Vec<Value>,
    ctx: &mut BuiltinContext<'_>,
) -> Result<Value, EvalError> {
    if Rc::ptr_eq(function, &builtins.print) {
        let value = arguments.into_iter().next().unwrap_or(Value::Unit);
        ctx.print
            .print_line(&value.to_string())
            .map_err(EvalError::from)?;
        Ok(Value::Unit)
    } else if Rc::ptr_eq(function, &builtins.input) {
        let line = ctx.input.read_line().map_err(EvalError::from)?;
        Ok(Value::from(line))
    } else if Rc::ptr_eq(function, &builtins.rnd) {
        let max = match arguments.into_iter().next() {
            Some(Value::Int(n)) => n,
            other => {
                return Err(StructuralError::new(format!("rnd expects a single Int argument, got {other:?}")).into())
            }
        };
        if max <= 0 {
            return Err(StructuralError::new(format!("rnd requires max > 0, got {max}")).into());
        }
        let drawn = ctx.rng().gen_range(0..max);
        Ok(Value::Int(drawn))
    } else {
        Err(StructuralError::new(format!("{} is not a registered builtin", function.name)).into())
    }
}
