//! The IR pretty-printer.
//!
//! Writes to any `std::fmt::Write` sink, generic the same way the I/O seam
//! is. Indentation is tracked with a single mutable "current indent" counter
//! the printer increments before descending into a nested statement and
//! decrements afterward, clamped at zero so an unbalanced label never drives
//! it negative.

use std::fmt::{self, Write};

use crate::{
    bound::{BoundBlockStatement, BoundExpression, BoundStatement, LiteralValue},
    error::PrintError,
    operators::{BinaryOperatorKind, UnaryOperatorKind},
};

const INDENT_UNIT: &str = "    ";

fn unary_precedence(kind: UnaryOperatorKind) -> u8 {
    match kind {
        UnaryOperatorKind::Identity | UnaryOperatorKind::Negation | UnaryOperatorKind::LogicalNot => 6,
    }
}

fn binary_precedence(kind: BinaryOperatorKind) -> u8 {
    use BinaryOperatorKind::{
        Add, Divide, Equals, Greater, GreaterOrEquals, Less, LessOrEquals, LogicalAnd, LogicalOr, Modulo, Multiply,
        NotEquals, Subtract,
    };
    match kind {
        LogicalOr => 1,
        LogicalAnd => 2,
        Equals | NotEquals | Less | LessOrEquals | Greater | GreaterOrEquals => 3,
        Add | Subtract => 4,
        Multiply | Divide | Modulo => 5,
    }
}

fn binary_symbol(kind: BinaryOperatorKind) -> &'static str {
    use BinaryOperatorKind::{
        Add, Divide, Equals, Greater, GreaterOrEquals, Less, LessOrEquals, LogicalAnd, LogicalOr, Modulo, Multiply,
        NotEquals, Subtract,
    };
    match kind {
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Modulo => "%",
        Equals => "==",
        NotEquals => "!=",
        Less => "<",
        LessOrEquals => "<=",
        Greater => ">",
        GreaterOrEquals => ">=",
        LogicalAnd => "&&",
        LogicalOr => "||",
    }
}

fn unary_symbol(kind: UnaryOperatorKind) -> &'static str {
    match kind {
        UnaryOperatorKind::Identity => "+",
        UnaryOperatorKind::Negation => "-",
        UnaryOperatorKind::LogicalNot => "!",
    }
}

/// Renders `block` to `out`, ASCII-only, with four-space indentation.
///
/// # Errors
/// Returns [`PrintError`] when the tree contains an `Error` placeholder or
/// any other node the printer has no rendering for.
pub fn write_to(block: &BoundBlockStatement, out: &mut dyn Write) -> Result<(), PrintError> {
    let mut printer = Printer { indent: 0 };
    printer.write_block(block, out)
}

/// Renders `block` to a fresh `String`, a convenience wrapper around
/// [`write_to`] for tests and callers that don't have a sink handy.
///
/// # Errors
/// See [`write_to`].
pub fn print_to_string(block: &BoundBlockStatement) -> Result<String, PrintError> {
    let mut out = String::new();
    write_to(block, &mut out)?;
    Ok(out)
}

struct Printer {
    indent: u32,
}

impl Printer {
    fn write_indent(&self, out: &mut dyn Write) -> fmt::Result {
        for _ in 0..self.indent {
            out.write_str(INDENT_UNIT)?;
        }
        Ok(())
    }

    fn indented<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += 1;
        let result = body(self);
        self.indent = self.indent.saturating_sub(1);
        result
    }

    fn write_block(&mut self, block: &BoundBlockStatement, out: &mut dyn Write) -> Result<(), PrintError> {
        for statement in &block.statements {
            self.write_statement(statement, out)?;
        }
        Ok(())
    }

    fn write_statement(&mut self, statement: &BoundStatement, out: &mut dyn Write) -> Result<(), PrintError> {
        map_fmt_err(|| self.write_statement_inner(statement, out))
    }

    /// A block writes each child through this same function, so nested
    /// blocks never grow an indent level of their own — only `If`/`While`/
    /// `DoWhile`/`For` bodies do that, via `indented`.
    fn write_statement_inner(&mut self, statement: &BoundStatement, out: &mut dyn Write) -> fmt::Result {
        if let BoundStatement::Block(block) = statement {
            for inner in &block.statements {
                self.write_statement_inner(inner, out)?;
            }
            return Ok(());
        }
        if matches!(statement, BoundStatement::Label(_)) {
            // Labels render one indent level shallower than their
            // surrounding block, clamped at zero, then indentation is
            // restored for whatever follows.
            let saved = self.indent;
            self.indent = self.indent.saturating_sub(1);
            self.write_indent(out)?;
            self.indent = saved;
        } else {
            self.write_indent(out)?;
        }
        self.write_statement_body(statement, out)
    }

    fn write_statement_body(&mut self, statement: &BoundStatement, out: &mut dyn Write) -> fmt::Result {
        match statement {
            BoundStatement::Block(_) => unreachable!("handled in write_statement_inner"),
            BoundStatement::Expression(expression) => {
                self.write_expression(expression, out, 0)?;
                writeln!(out)
            }
            BoundStatement::VariableDeclaration(symbol, initializer) => {
                let keyword = if symbol.is_read_only { "imply" } else { "let" };
                write!(out, "{keyword} {} = ", symbol.name)?;
                self.write_expression(initializer, out, 0)?;
                writeln!(out)
            }
            BoundStatement::If { condition, then, or_else } => {
                write!(out, "if ")?;
                self.write_expression(condition, out, 0)?;
                writeln!(out, " {{")?;
                self.indented(|p| p.write_statement_inner(then, out))?;
                self.write_indent(out)?;
                writeln!(out, "}}")?;
                if let Some(or_else) = or_else {
                    self.write_indent(out)?;
                    writeln!(out, "else {{")?;
                    self.indented(|p| p.write_statement_inner(or_else, out))?;
                    self.write_indent(out)?;
                    writeln!(out, "}}")?;
                }
                Ok(())
            }
            BoundStatement::While { condition, body } => {
                write!(out, "while ")?;
                self.write_expression(condition, out, 0)?;
                writeln!(out, " {{")?;
                self.indented(|p| p.write_statement_inner(body, out))?;
                self.write_indent(out)?;
                writeln!(out, "}}")
            }
            BoundStatement::DoWhile { body, condition } => {
                writeln!(out, "do {{")?;
                self.indented(|p| p.write_statement_inner(body, out))?;
                self.write_indent(out)?;
                write!(out, "}} while ")?;
                self.write_expression(condition, out, 0)?;
                writeln!(out)
            }
            BoundStatement::For {
                variable,
                lower_bound,
                upper_bound,
                body,
            } => {
                write!(out, "for {} in ", variable.name)?;
                self.write_expression(lower_bound, out, 0)?;
                write!(out, "..")?;
                self.write_expression(upper_bound, out, 0)?;
                writeln!(out, " {{")?;
                self.indented(|p| p.write_statement_inner(body, out))?;
                self.write_indent(out)?;
                writeln!(out, "}}")
            }
            BoundStatement::Label(label) => {
                // The indent for this line was already written (one level
                // shallower) by `write_statement_inner`.
                writeln!(out, "{}:", label.name)
            }
            BoundStatement::Goto(label) => writeln!(out, "goto {}", label.name),
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => {
                write!(out, "goto {} ", label.name)?;
                if *jump_if_true {
                    write!(out, "if ")?;
                } else {
                    write!(out, "unless ")?;
                }
                self.write_expression(condition, out, 0)?;
                writeln!(out)
            }
            BoundStatement::Return(value) => match value {
                Some(expression) => {
                    write!(out, "return ")?;
                    self.write_expression(expression, out, 0)?;
                    writeln!(out)
                }
                None => writeln!(out, "return"),
            },
        }
    }

    fn write_expression(&self, expression: &BoundExpression, out: &mut dyn Write, parent_precedence: u8) -> fmt::Result {
        match expression {
            BoundExpression::Literal(literal, _) => Self::write_literal(literal, out),
            BoundExpression::Variable(symbol) => out.write_str(&symbol.name),
            BoundExpression::Assignment(symbol, value) => {
                write!(out, "{} = ", symbol.name)?;
                self.write_expression(value, out, 0)
            }
            BoundExpression::Unary(op, operand) => {
                let precedence = unary_precedence(op.kind);
                let needs_parens = precedence < parent_precedence;
                if needs_parens {
                    out.write_char('(')?;
                }
                out.write_str(unary_symbol(op.kind))?;
                self.write_expression(operand, out, precedence)?;
                if needs_parens {
                    out.write_char(')')?;
                }
                Ok(())
            }
            BoundExpression::Binary(left, op, right) => {
                let precedence = binary_precedence(op.kind);
                let needs_parens = precedence < parent_precedence;
                if needs_parens {
                    out.write_char('(')?;
                }
                self.write_expression(left, out, precedence)?;
                write!(out, " {} ", binary_symbol(op.kind))?;
                // Right operand binds one tighter so `a - (b - c)` keeps its
                // parentheses instead of silently reassociating.
                self.write_expression(right, out, precedence + 1)?;
                if needs_parens {
                    out.write_char(')')?;
                }
                Ok(())
            }
            BoundExpression::Call(function, arguments) => {
                write!(out, "{}(", function.name)?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        out.write_str(", ")?;
                    }
                    self.write_expression(argument, out, 0)?;
                }
                out.write_char(')')
            }
            BoundExpression::Conversion(target_type, inner) => {
                write!(out, "{target_type}(")?;
                self.write_expression(inner, out, 0)?;
                out.write_char(')')
            }
            BoundExpression::Error => Err(fmt::Error),
        }
    }

    fn write_literal(literal: &LiteralValue, out: &mut dyn Write) -> fmt::Result {
        match literal {
            LiteralValue::Bool(true) => out.write_str("true"),
            LiteralValue::Bool(false) => out.write_str("false"),
            LiteralValue::Int(n) => write!(out, "{n}"),
            LiteralValue::String(s) => {
                out.write_char('"')?;
                for ch in s.chars() {
                    if ch == '"' {
                        out.write_str("\"\"")?;
                    } else {
                        out.write_char(ch)?;
                    }
                }
                out.write_char('"')
            }
            LiteralValue::Null => Err(fmt::Error),
        }
    }
}

/// `fmt::Write` only carries `fmt::Error`, which has no message — this maps
/// that single failure case to a [`PrintError`] callers can actually read.
fn map_fmt_err(body: impl FnOnce() -> fmt::Result) -> Result<(), PrintError> {
    body().map_err(|_| PrintError::new("printer encountered a node it cannot render (Error or Null literal)"))
}
