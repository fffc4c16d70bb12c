//! End-to-end evaluator scenarios built directly through the bound IR's
//! construction API, since this crate has no parser of its own.

use std::{collections::HashMap, rc::Rc};

use indexmap::IndexMap;
use vivian_core::{
    bound::{BoundBlockStatement, BoundExpression, BoundProgram, BoundStatement},
    builtins::BuiltinContext,
    io::{CollectStringPrint, ScriptedInput},
    operators::{BinaryOperator, BinaryOperatorKind, UnaryOperator, UnaryOperatorKind},
    symbol::BoundLabel,
    tracer::NoopTracer,
    EvalError, Evaluator, FunctionSymbol, Type, Value, VariableSymbol,
};

fn run(
    functions: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
    entry: Rc<FunctionSymbol>,
    globals: &mut HashMap<*const VariableSymbol, Value>,
    ctx: &mut BuiltinContext<'_>,
) -> Value {
    let program = BoundProgram::new(Some(entry), None, functions, None);
    let evaluator = Evaluator::new(&program);
    evaluator.run(&program, globals, ctx, &NoopTracer).unwrap()
}

fn no_host() -> (CollectStringPrint, ScriptedInput) {
    (CollectStringPrint::new(), ScriptedInput::new(Vec::<String>::new()))
}

/// Scenario S1: a called function sums its two parameters; `main` forwards
/// the call and returns the result untouched.
#[test]
fn s1_calls_a_function_that_sums_its_parameters() {
    let a = Rc::new(VariableSymbol::new_parameter("a", Type::Int));
    let b = Rc::new(VariableSymbol::new_parameter("b", Type::Int));
    let sum = Rc::new(FunctionSymbol::new("sum", vec![Rc::clone(&a), Rc::clone(&b)], Type::Int));
    let sum_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::binary(
        BoundExpression::variable(a),
        BinaryOperator::fixed(BinaryOperatorKind::Add, Type::Int, Type::Int),
        BoundExpression::variable(b),
    )))]);

    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let main_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::call(
        Rc::clone(&sum),
        vec![BoundExpression::literal_int(4), BoundExpression::literal_int(5)],
    )))]);

    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), main_body);
    functions.insert(sum, sum_body);

    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    assert_eq!(run(functions, main, &mut globals, &mut ctx), Value::Int(9));
}

/// Scenario S2: `print` is observed by the host sink and the function's own
/// return value is unaffected by what it printed.
#[test]
fn s2_print_is_observed_and_independent_of_the_return_value() {
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let functions_probe = IndexMap::new();
    let probe_program = BoundProgram::new(Some(Rc::clone(&main)), None, functions_probe, None);
    let print_symbol = Rc::clone(&Evaluator::new(&probe_program).builtins().print);

    let body = BoundBlockStatement::new(vec![
        BoundStatement::Expression(BoundExpression::call(
            print_symbol,
            vec![BoundExpression::literal_string("hello")],
        )),
        BoundStatement::Return(Some(BoundExpression::literal_int(7))),
    ]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);

    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    let result = run(functions, main, &mut globals, &mut ctx);

    assert_eq!(result, Value::Int(7));
    assert_eq!(print.joined(), "hello");
}

/// Scenario S3: a loop lowered to labels and conditional gotos sums 1..=3.
#[test]
fn s3_lowered_loop_sums_one_to_three() {
    let sum = Rc::new(VariableSymbol::new_local("sum", Type::Int, false));
    let i = Rc::new(VariableSymbol::new_local("i", Type::Int, false));
    let loop_top = Rc::new(BoundLabel::new("loop_top"));
    let loop_end = Rc::new(BoundLabel::new("loop_end"));

    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let body = BoundBlockStatement::new(vec![
        BoundStatement::VariableDeclaration(Rc::clone(&sum), BoundExpression::literal_int(0)),
        BoundStatement::VariableDeclaration(Rc::clone(&i), BoundExpression::literal_int(1)),
        BoundStatement::Label(Rc::clone(&loop_top)),
        BoundStatement::conditional_goto(
            Rc::clone(&loop_end),
            BoundExpression::binary(
                BoundExpression::variable(Rc::clone(&i)),
                BinaryOperator::fixed(BinaryOperatorKind::Greater, Type::Int, Type::Bool),
                BoundExpression::literal_int(3),
            ),
            true,
        ),
        BoundStatement::VariableDeclaration(
            Rc::clone(&sum),
            BoundExpression::binary(
                BoundExpression::variable(Rc::clone(&sum)),
                BinaryOperator::fixed(BinaryOperatorKind::Add, Type::Int, Type::Int),
                BoundExpression::variable(Rc::clone(&i)),
            ),
        ),
        BoundStatement::VariableDeclaration(
            Rc::clone(&i),
            BoundExpression::binary(
                BoundExpression::variable(Rc::clone(&i)),
                BinaryOperator::fixed(BinaryOperatorKind::Add, Type::Int, Type::Int),
                BoundExpression::literal_int(1),
            ),
        ),
        BoundStatement::Goto(Rc::clone(&loop_top)),
        BoundStatement::Label(Rc::clone(&loop_end)),
        BoundStatement::Return(Some(BoundExpression::variable(sum))),
    ]);

    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);

    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    assert_eq!(run(functions, main, &mut globals, &mut ctx), Value::Int(6));
}

/// Scenario S4: a callee gets its own isolated local scope — a parameter
/// sharing a name with the caller's local does not leak either way.
#[test]
fn s4_call_gets_an_isolated_local_scope() {
    let callee_param = Rc::new(VariableSymbol::new_parameter("x", Type::Int));
    let callee = Rc::new(FunctionSymbol::new("double", vec![Rc::clone(&callee_param)], Type::Int));
    let callee_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::binary(
        BoundExpression::variable(Rc::clone(&callee_param)),
        BinaryOperator::fixed(BinaryOperatorKind::Add, Type::Int, Type::Int),
        BoundExpression::variable(callee_param),
    )))]);

    let caller_local = Rc::new(VariableSymbol::new_local("x", Type::Int, false));
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let main_body = BoundBlockStatement::new(vec![
        BoundStatement::VariableDeclaration(Rc::clone(&caller_local), BoundExpression::literal_int(100)),
        BoundStatement::Return(Some(BoundExpression::binary(
            BoundExpression::call(Rc::clone(&callee), vec![BoundExpression::literal_int(21)]),
            BinaryOperator::fixed(BinaryOperatorKind::Add, Type::Int, Type::Int),
            BoundExpression::variable(caller_local),
        ))),
    ]);

    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), main_body);
    functions.insert(callee, callee_body);

    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    // double(21) = 42, plus the caller's own x (100) = 142. A leaked scope
    // would let the callee's parameter clobber or read the caller's local.
    assert_eq!(run(functions, main, &mut globals, &mut ctx), Value::Int(142));
}

/// Scenario S5: `input` round-trips through an explicit conversion to `Int`.
#[test]
fn s5_input_feeds_a_conversion_to_int() {
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let probe_program = BoundProgram::new(Some(Rc::clone(&main)), None, IndexMap::new(), None);
    let input_symbol = Rc::clone(&Evaluator::new(&probe_program).builtins().input);

    let body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::conversion(
        Type::Int,
        BoundExpression::call(input_symbol, Vec::new()),
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);

    let mut globals = HashMap::new();
    let mut print = CollectStringPrint::new();
    let mut input = ScriptedInput::new(["true"]);
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    assert_eq!(run(functions, main, &mut globals, &mut ctx), Value::Int(1));
}

/// Scenario S6 (evaluator half): `rnd` always stays within `[0, max)` and is
/// reproducible under a fixed seed. The pretty-printer half of S6 lives in
/// `tests/printer.rs`.
#[test]
fn s6_rnd_stays_in_range_and_is_seed_reproducible() {
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let probe_program = BoundProgram::new(Some(Rc::clone(&main)), None, IndexMap::new(), None);
    let rnd_symbol = Rc::clone(&Evaluator::new(&probe_program).builtins().rnd);

    let body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::call(
        Rc::clone(&rnd_symbol),
        vec![BoundExpression::literal_int(10)],
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);
    let program = BoundProgram::new(Some(Rc::clone(&main)), None, functions, None);
    let evaluator = Evaluator::new(&program);

    let mut globals = HashMap::new();
    let (mut print_a, mut input_a) = no_host();
    let mut ctx_a = BuiltinContext::new(&mut print_a, &mut input_a).with_seed(7);
    let (mut print_b, mut input_b) = no_host();
    let mut ctx_b = BuiltinContext::new(&mut print_b, &mut input_b).with_seed(7);

    for _ in 0..50 {
        let a = evaluator.run(&program, &mut globals, &mut ctx_a, &NoopTracer).unwrap();
        let b = evaluator.run(&program, &mut globals, &mut ctx_b, &NoopTracer).unwrap();
        assert_eq!(a, b);
        match a {
            Value::Int(n) => assert!((0..10).contains(&n)),
            other => panic!("expected Int, got {other:?}"),
        }
    }
}

/// Program-chain traversal: a function missing from the latest program but
/// present in `previous` is still callable.
#[test]
fn previous_program_functions_remain_callable() {
    let helper = Rc::new(FunctionSymbol::new("helper", Vec::new(), Type::Int));
    let mut old_functions = IndexMap::new();
    old_functions.insert(
        Rc::clone(&helper),
        BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::literal_int(42)))]),
    );
    let old_program = Rc::new(BoundProgram::new(None, None, old_functions, None));

    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let main_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::call(
        helper,
        Vec::new(),
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), main_body);
    let program = BoundProgram::new(Some(Rc::clone(&main)), None, functions, Some(old_program));

    let evaluator = Evaluator::new(&program);
    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    let result = evaluator.run(&program, &mut globals, &mut ctx, &NoopTracer).unwrap();
    assert_eq!(result, Value::Int(42));
}

/// A function body that falls off the end right after a bare declaration
/// (no explicit `Return`) yields the declared value, not `Unit`.
#[test]
fn falling_off_the_end_after_a_declaration_returns_its_value() {
    let x = Rc::new(VariableSymbol::new_local("x", Type::Int, false));
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let body = BoundBlockStatement::new(vec![BoundStatement::VariableDeclaration(
        x,
        BoundExpression::literal_int(9),
    )]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);

    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    assert_eq!(run(functions, main, &mut globals, &mut ctx), Value::Int(9));
}

/// Division and modulo by a runtime-zero divisor surface as an
/// [`EvalError`], never a process panic.
#[test]
fn division_and_modulo_by_zero_surface_as_errors_not_panics() {
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Int));
    let divide_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::binary(
        BoundExpression::literal_int(1),
        BinaryOperator::fixed(BinaryOperatorKind::Divide, Type::Int, Type::Int),
        BoundExpression::literal_int(0),
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), divide_body);
    let program = BoundProgram::new(Some(Rc::clone(&main)), None, functions, None);
    let evaluator = Evaluator::new(&program);
    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    let result = evaluator.run(&program, &mut globals, &mut ctx, &NoopTracer);
    assert!(matches!(result, Err(EvalError::Arithmetic(_))));

    let modulo_body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::binary(
        BoundExpression::literal_int(1),
        BinaryOperator::fixed(BinaryOperatorKind::Modulo, Type::Int, Type::Int),
        BoundExpression::literal_int(0),
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), modulo_body);
    let program = BoundProgram::new(Some(main), None, functions, None);
    let evaluator = Evaluator::new(&program);
    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    let result = evaluator.run(&program, &mut globals, &mut ctx, &NoopTracer);
    assert!(matches!(result, Err(EvalError::Arithmetic(_))));
}

/// A malformed bound tree asking for an explicit-only conversion (e.g.
/// `String -> Bool`) where an implicit one is required is rejected with a
/// structural error rather than silently performed.
#[test]
fn unary_with_a_non_implicit_operand_conversion_is_rejected() {
    let main = Rc::new(FunctionSymbol::new("main", Vec::new(), Type::Bool));
    let op = UnaryOperator::new(UnaryOperatorKind::LogicalNot, Type::Bool, Type::Bool);
    let body = BoundBlockStatement::new(vec![BoundStatement::Return(Some(BoundExpression::unary(
        op,
        BoundExpression::literal_string("true"),
    )))]);
    let mut functions = IndexMap::new();
    functions.insert(Rc::clone(&main), body);
    let program = BoundProgram::new(Some(main), None, functions, None);
    let evaluator = Evaluator::new(&program);
    let mut globals = HashMap::new();
    let (mut print, mut input) = no_host();
    let mut ctx = BuiltinContext::new(&mut print, &mut input);
    let result = evaluator.run(&program, &mut globals, &mut ctx, &NoopTracer);
    assert!(matches!(result, Err(EvalError::Structural(_))));
}
