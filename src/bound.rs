//! The Bound IR: a pure, immutable data layer.
//!
//! Every node carries a resolved [`Type`] and is tagged by a `kind` that is
//! implicit in which enum variant it is — Rust's pattern matching stands in
//! for a closed enumeration plus kind tag, so there is no separate
//! `NodeKind` discriminant to keep in sync.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    operators::{BinaryOperator, UnaryOperator},
    symbol::{BoundLabel, FunctionSymbol, VariableSymbol},
    types::Type,
};

/// A literal value as it appears in the bound tree, before it becomes a
/// runtime [`crate::value::Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    String(Rc<str>),
    /// "No value" — never produced by concrete syntax, never printable.
    Null,
}

/// A typed expression.
#[derive(Clone)]
pub enum BoundExpression {
    Literal(LiteralValue, Type),
    Variable(Rc<VariableSymbol>),
    Assignment(Rc<VariableSymbol>, Box<BoundExpression>),
    Unary(UnaryOperator, Box<BoundExpression>),
    Binary(Box<BoundExpression>, BinaryOperator, Box<BoundExpression>),
    Call(Rc<FunctionSymbol>, Vec<BoundExpression>),
    Conversion(Type, Box<BoundExpression>),
    /// Propagated placeholder for a binder error. Pretty-printable (renders
    /// as a structural error, same as any other unhandled kind) but must
    /// never reach the evaluator.
    Error,
}

impl BoundExpression {
    #[must_use]
    pub fn literal_bool(b: bool) -> Self {
        Self::Literal(LiteralValue::Bool(b), Type::Bool)
    }

    #[must_use]
    pub fn literal_int(n: i64) -> Self {
        Self::Literal(LiteralValue::Int(n), Type::Int)
    }

    #[must_use]
    pub fn literal_string(s: impl Into<Rc<str>>) -> Self {
        Self::Literal(LiteralValue::String(s.into()), Type::String)
    }

    #[must_use]
    pub fn variable(symbol: Rc<VariableSymbol>) -> Self {
        Self::Variable(symbol)
    }

    #[must_use]
    pub fn assignment(symbol: Rc<VariableSymbol>, expression: BoundExpression) -> Self {
        Self::Assignment(symbol, Box::new(expression))
    }

    #[must_use]
    pub fn unary(op: UnaryOperator, operand: BoundExpression) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    #[must_use]
    pub fn binary(left: BoundExpression, op: BinaryOperator, right: BoundExpression) -> Self {
        Self::Binary(Box::new(left), op, Box::new(right))
    }

    #[must_use]
    pub fn call(function: Rc<FunctionSymbol>, arguments: Vec<BoundExpression>) -> Self {
        Self::Call(function, arguments)
    }

    #[must_use]
    pub fn conversion(target_type: Type, expression: BoundExpression) -> Self {
        Self::Conversion(target_type, Box::new(expression))
    }

    /// The resolved type every bound expression carries.
    #[must_use]
    pub fn ty(&self) -> Type {
        match self {
            Self::Literal(_, ty) => *ty,
            Self::Variable(sym) => sym.ty,
            Self::Assignment(sym, _) => sym.ty,
            Self::Unary(op, _) => op.result_type,
            Self::Binary(_, op, _) => op
                .result_type
                .unwrap_or_else(|| crate::types::promote(op.kind.is_additive(), op.left_type, op.right_type)),
            Self::Call(func, _) => func.return_type,
            Self::Conversion(ty, _) => *ty,
            Self::Error => Type::Error,
        }
    }
}

/// A statement inside a function body.
#[derive(Clone)]
pub enum BoundStatement {
    Block(BoundBlockStatement),
    Expression(BoundExpression),
    VariableDeclaration(Rc<VariableSymbol>, BoundExpression),
    /// Pretty-print only; the evaluator sees lowered conditional gotos
    /// instead.
    If {
        condition: BoundExpression,
        then: Box<BoundStatement>,
        or_else: Option<Box<BoundStatement>>,
    },
    /// Pretty-print only.
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
    },
    /// Pretty-print only.
    DoWhile {
        body: Box<BoundStatement>,
        condition: BoundExpression,
    },
    /// Pretty-print only.
    For {
        variable: Rc<VariableSymbol>,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: Box<BoundStatement>,
    },
    Label(Rc<BoundLabel>),
    Goto(Rc<BoundLabel>),
    ConditionalGoto {
        label: Rc<BoundLabel>,
        condition: BoundExpression,
        jump_if_true: bool,
    },
    Return(Option<BoundExpression>),
}

impl BoundStatement {
    #[must_use]
    pub fn if_statement(condition: BoundExpression, then: BoundStatement, or_else: Option<BoundStatement>) -> Self {
        Self::If {
            condition,
            then: Box::new(then),
            or_else: or_else.map(Box::new),
        }
    }

    #[must_use]
    pub fn while_statement(condition: BoundExpression, body: BoundStatement) -> Self {
        Self::While {
            condition,
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn do_while_statement(body: BoundStatement, condition: BoundExpression) -> Self {
        Self::DoWhile {
            body: Box::new(body),
            condition,
        }
    }

    #[must_use]
    pub fn for_statement(
        variable: Rc<VariableSymbol>,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: BoundStatement,
    ) -> Self {
        Self::For {
            variable,
            lower_bound,
            upper_bound,
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn conditional_goto(label: Rc<BoundLabel>, condition: BoundExpression, jump_if_true: bool) -> Self {
        Self::ConditionalGoto {
            label,
            condition,
            jump_if_true,
        }
    }
}

/// A block of statements. Every statement the evaluator walks lives inside
/// one of these; it is also a function body.
#[derive(Clone, Default)]
pub struct BoundBlockStatement {
    pub statements: Vec<BoundStatement>,
}

impl BoundBlockStatement {
    #[must_use]
    pub fn new(statements: Vec<BoundStatement>) -> Self {
        Self { statements }
    }
}

/// A complete, lowered program ready for evaluation.
///
/// `previous` chains to an earlier program whose function definitions
/// remain in scope; see [`crate::evaluator::Evaluator`] for how the chain is
/// walked and deduplicated.
pub struct BoundProgram {
    pub main_function: Option<Rc<FunctionSymbol>>,
    pub script_function: Option<Rc<FunctionSymbol>>,
    pub functions: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
    pub previous: Option<Rc<BoundProgram>>,
}

impl BoundProgram {
    #[must_use]
    pub fn new(
        main_function: Option<Rc<FunctionSymbol>>,
        script_function: Option<Rc<FunctionSymbol>>,
        functions: IndexMap<Rc<FunctionSymbol>, BoundBlockStatement>,
        previous: Option<Rc<BoundProgram>>,
    ) -> Self {
        Self {
            main_function,
            script_function,
            functions,
            previous,
        }
    }

    /// The entry point to evaluate: `mainFunction` wins when both are set.
    #[must_use]
    pub fn entry_function(&self) -> Option<&Rc<FunctionSymbol>> {
        self.main_function.as_ref().or(self.script_function.as_ref())
    }
}
