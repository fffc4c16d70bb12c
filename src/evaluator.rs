//! The tree-walking evaluator.
//!
//! Variables live in a stack of scopes searched innermost-first. A function
//! body is walked as a flat list of statements (after lowering) with an
//! explicit instruction pointer that `Goto`/`ConditionalGoto` can overwrite
//! directly, rather than recursing through `if`/`while`.

use std::{collections::HashMap, rc::Rc};

use indexmap::IndexMap;

use crate::{
    bound::{BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement, LiteralValue},
    builtins::{self, BuiltinContext, BuiltinFunctions},
    error::{EvalError, StructuralError},
    symbol::{BoundLabel, FunctionSymbol, VariableSymbol},
    tracer::Tracer,
    value::Value,
};

/// A single call frame's local bindings.
type LocalScope = HashMap<*const VariableSymbol, Value>;

/// Variable storage: one global map the caller owns across evaluations, and
/// a stack of local scopes pushed/popped once per call.
pub struct Scopes<'a> {
    globals: &'a mut HashMap<*const VariableSymbol, Value>,
    locals: Vec<LocalScope>,
}

impl<'a> Scopes<'a> {
    #[must_use]
    pub fn new(globals: &'a mut HashMap<*const VariableSymbol, Value>) -> Self {
        Self {
            globals,
            locals: Vec::new(),
        }
    }

    fn key(symbol: &Rc<VariableSymbol>) -> *const VariableSymbol {
        Rc::as_ptr(symbol)
    }

    fn push_call_frame(&mut self) {
        self.locals.push(LocalScope::new());
    }

    fn pop_call_frame(&mut self) {
        self.locals.pop();
    }

    fn is_global(symbol: &VariableSymbol) -> bool {
        matches!(symbol.kind, crate::symbol::SymbolKind::GlobalVariable)
    }

    fn get(&self, symbol: &Rc<VariableSymbol>) -> Option<Value> {
        if Self::is_global(symbol) {
            return self.globals.get(&Self::key(symbol)).cloned();
        }
        self.locals.last().and_then(|frame| frame.get(&Self::key(symbol)).cloned())
    }

    fn set(&mut self, symbol: &Rc<VariableSymbol>, value: Value) {
        if Self::is_global(symbol) {
            self.globals.insert(Self::key(symbol), value);
        } else if let Some(frame) = self.locals.last_mut() {
            frame.insert(Self::key(symbol), value);
        }
    }
}

/// A flattened, label-indexed function body: the statement dispatcher's
/// unit of work.
struct FlatBody {
    statements: Vec<BoundStatement>,
    labels: HashMap<*const BoundLabel, usize>,
}

fn flatten(block: &BoundBlockStatement) -> FlatBody {
    let mut statements = Vec::new();
    flatten_into(block, &mut statements);
    let mut labels = HashMap::new();
    for (index, statement) in statements.iter().enumerate() {
        if let BoundStatement::Label(label) = statement {
            labels.insert(Rc::as_ptr(label), index);
        }
    }
    FlatBody { statements, labels }
}

fn flatten_into(block: &BoundBlockStatement, out: &mut Vec<BoundStatement>) {
    for statement in &block.statements {
        match statement {
            BoundStatement::Block(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

/// The evaluator: holds the resolved function table and built-in registry
/// for one logical program and its `previous` chain.
pub struct Evaluator {
    functions: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
    builtins: BuiltinFunctions,
}

impl Evaluator {
    /// Builds the function table by walking `program` and then
    /// `program.previous`, oldest last. A function symbol already present
    /// (by identity) is never overwritten — the latest-encountered
    /// definition, found first by this walk, always wins: later definitions
    /// shadow earlier ones across the chain.
    #[must_use]
    pub fn new(program: &BoundProgram) -> Self {
        let mut functions = IndexMap::new();
        let mut current = Some(program);
        while let Some(p) = current {
            for (symbol, body) in &p.functions {
                functions.entry(Rc::clone(symbol)).or_insert_with(|| body.clone());
            }
            current = p.previous.as_deref();
        }
        Self {
            functions,
            builtins: BuiltinFunctions::canonical(),
        }
    }

    #[must_use]
    pub fn builtins(&self) -> &BuiltinFunctions {
        &self.builtins
    }

    /// Evaluates `program`'s entry function.
    ///
    /// # Errors
    /// Returns [`EvalError`] if the entry function is missing, a built-in
    /// call fails, or the bound tree violates an invariant.
    pub fn run(
        &self,
        program: &BoundProgram,
        globals: &mut HashMap<*const VariableSymbol, Value>,
        ctx: &mut BuiltinContext<'_>,
        tracer: &dyn Tracer,
    ) -> Result<Value, EvalError> {
        let entry = program
            .entry_function()
            .ok_or_else(|| StructuralError::new("program has neither a main nor a script function"))?;
        let mut scopes = Scopes::new(globals);
        self.call_function(entry, Vec::new(), &mut scopes, ctx, tracer)
    }

    fn call_function(
        &self,
        function: &Rc<FunctionSymbol>,
        arguments: Vec<Value>,
        scopes: &mut Scopes<'_>,
        ctx: &mut BuiltinContext<'_>,
        tracer: &dyn Tracer,
    ) -> Result<Value, EvalError> {
        if self.builtins.is_builtin(function) {
            tracer.on_call(function, &arguments);
            let result = builtins::call(&self.builtins, function, arguments, ctx)?;
            tracer.on_return(function, &result);
            return Ok(result);
        }

        let body = self
            .functions
            .get(function)
            .ok_or_else(|| StructuralError::new(format!("call to undefined function {}", function.name)))?;
        let flat = flatten(body);

        tracer.on_call(function, &arguments);
        scopes.push_call_frame();
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            scopes.set(parameter, value);
        }

        let result = self.run_statements(&flat, scopes, ctx, tracer);

        scopes.pop_call_frame();
        let result = result?;
        tracer.on_return(function, &result);
        Ok(result)
    }

    /// The label-indexed statement dispatcher: an explicit instruction
    /// pointer walks `flat.statements`; `Goto`/`ConditionalGoto`
    /// overwrite it directly instead of recursing. Falling off the end
    /// returns the last expression statement's value, or `Unit`.
    fn run_statements(
        &self,
        flat: &FlatBody,
        scopes: &mut Scopes<'_>,
        ctx: &mut BuiltinContext<'_>,
        tracer: &dyn Tracer,
    ) -> Result<Value, EvalError> {
        let mut ip = 0;
        let mut last_value = Value::Unit;

        while ip < flat.statements.len() {
            match &flat.statements[ip] {
                BoundStatement::VariableDeclaration(symbol, initializer) => {
                    let value = self.eval(initializer, scopes, ctx, tracer)?;
                    last_value = value.clone();
                    scopes.set(symbol, value);
                }
                BoundStatement::Expression(expression) => {
                    last_value = self.eval(expression, scopes, ctx, tracer)?;
                }
                BoundStatement::Label(_) => {}
                BoundStatement::Goto(label) => {
                    tracer.on_goto(&label.name);
                    ip = *flat
                        .labels
                        .get(&Rc::as_ptr(label))
                        .ok_or_else(|| StructuralError::new(format!("undefined label {}", label.name)))?;
                    continue;
                }
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let condition_value = self.eval(condition, scopes, ctx, tracer)?.is_truthy();
                    if condition_value == *jump_if_true {
                        tracer.on_goto(&label.name);
                        ip = *flat
                            .labels
                            .get(&Rc::as_ptr(label))
                            .ok_or_else(|| StructuralError::new(format!("undefined label {}", label.name)))?;
                        continue;
                    }
                }
                BoundStatement::Return(expression) => {
                    return match expression {
                        Some(expression) => self.eval(expression, scopes, ctx, tracer),
                        None => Ok(Value::Unit),
                    };
                }
                BoundStatement::Block(_)
                | BoundStatement::If { .. }
                | BoundStatement::While { .. }
                | BoundStatement::DoWhile { .. }
                | BoundStatement::For { .. } => {
                    return Err(StructuralError::new(
                        "structured control-flow statement reached the evaluator unlowered",
                    )
                    .into());
                }
            }
            ip += 1;
        }

        Ok(last_value)
    }

    fn eval(
        &self,
        expression: &BoundExpression,
        scopes: &mut Scopes<'_>,
        ctx: &mut BuiltinContext<'_>,
        tracer: &dyn Tracer,
    ) -> Result<Value, EvalError> {
        match expression {
            BoundExpression::Literal(literal, _) => Ok(match literal {
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Int(n) => Value::Int(*n),
                LiteralValue::String(s) => Value::String(Rc::clone(s)),
                LiteralValue::Null => Value::Unit,
            }),
            BoundExpression::Variable(symbol) => scopes
                .get(symbol)
                .ok_or_else(|| StructuralError::new(format!("read of unbound variable {}", symbol.name)).into()),
            BoundExpression::Assignment(symbol, value) => {
                let value = self.eval(value, scopes, ctx, tracer)?;
                scopes.set(symbol, value.clone());
                Ok(value)
            }
            BoundExpression::Unary(op, operand) => {
                // The binder may widen the operand (e.g. Bool -> Int) before
                // the operator applies, and narrow the result back
                // afterward; both conversions are identities when the
                // declared types already match. The widening conversion must
                // be implicit — a bound tree asking for an explicit-only
                // conversion here violated the binder's contract.
                let operand_ty = operand.ty();
                if !crate::convert::classify(operand_ty, op.operand_type).is_implicit {
                    return Err(StructuralError::new(format!(
                        "unary operator {} requires an implicit conversion from {operand_ty} to {}",
                        op.kind, op.operand_type
                    ))
                    .into());
                }
                let operand = self.eval(operand, scopes, ctx, tracer)?;
                let operand = crate::convert::convert(op.operand_type, &operand)?;
                let raw = op.apply(operand)?;
                Ok(crate::convert::convert(op.result_type, &raw)?)
            }
            BoundExpression::Binary(left, op, right) => {
                match op.result_type {
                    Some(result_type) => {
                        let left = self.eval(left, scopes, ctx, tracer)?;
                        let right = self.eval(right, scopes, ctx, tracer)?;
                        let raw = op.apply(left, right)?;
                        Ok(crate::convert::convert(result_type, &raw)?)
                    }
                    None => {
                        // Polymorphic operator: promote both operands to a
                        // common type before applying, then convert the
                        // result back to that same promoted type. Both
                        // operand-to-result conversions must be implicit.
                        let result_type = crate::types::promote(op.kind.is_additive(), op.left_type, op.right_type);
                        if !crate::convert::classify(op.left_type, result_type).is_implicit
                            || !crate::convert::classify(op.right_type, result_type).is_implicit
                        {
                            return Err(StructuralError::new(format!(
                                "binary operator {} requires implicit conversions from {} and {} to {result_type}",
                                op.kind, op.left_type, op.right_type
                            ))
                            .into());
                        }
                        let left = self.eval(left, scopes, ctx, tracer)?;
                        let right = self.eval(right, scopes, ctx, tracer)?;
                        let left = crate::convert::convert(result_type, &left)?;
                        let right = crate::convert::convert(result_type, &right)?;
                        let raw = op.apply(left, right)?;
                        Ok(crate::convert::convert(result_type, &raw)?)
                    }
                }
            }
            BoundExpression::Call(function, arguments) => {
                let mut evaluated = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    evaluated.push(self.eval(argument, scopes, ctx, tracer)?);
                }
                self.call_function(function, evaluated, scopes, ctx, tracer)
            }
            BoundExpression::Conversion(target_type, inner) => {
                let value = self.eval(inner, scopes, ctx, tracer)?;
                Ok(crate::convert::convert(*target_type, &value)?)
            }
            BoundExpression::Error => Err(StructuralError::new("reached an unresolved Error expression node").into()),
        }
    }
}
