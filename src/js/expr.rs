//! Typed client expression tree.
//!
//! [`Expr`] is an immutable node describing a client-side computation. Every
//! node renders to a *primary* expression (self-delimited), so composite
//! nodes never depend on the client language's operator precedence.

use std::fmt;

use super::escape;
use crate::id::{InstanceId, VariableId};

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Operators available to [`Expr::operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Logical negation.
    Not,
    /// Logical conjunction (left fold).
    And,
    /// Logical disjunction (left fold).
    Or,
    /// Strict equality.
    Eq,
    /// Strict inequality.
    NotEq,
    /// `left.includes(right)`.
    Contains,
    /// String concatenation / numeric addition (left fold).
    Concat,
    /// `String(x)`.
    ToString,
    /// `Number(x)`.
    ToNumber,
    /// `Boolean(x)`.
    ToBool,
}

/// How many operands an [`Operator`] takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Whether `count` operands satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl Operator {
    /// Operand count accepted by this operator.
    pub fn arity(self) -> Arity {
        match self {
            Operator::Not | Operator::ToString | Operator::ToNumber | Operator::ToBool => {
                Arity::Exactly(1)
            }
            Operator::Eq | Operator::NotEq | Operator::Contains => Arity::Exactly(2),
            Operator::And | Operator::Or | Operator::Concat => Arity::AtLeast(2),
        }
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Eq => "eq",
            Operator::NotEq => "not_eq",
            Operator::Contains => "contains",
            Operator::Concat => "concat",
            Operator::ToString => "to_string",
            Operator::ToNumber => "to_number",
            Operator::ToBool => "to_bool",
        }
    }

    /// Infix token for the folding binary operators.
    fn infix(self) -> Option<&'static str> {
        match self {
            Operator::And => Some("&&"),
            Operator::Or => Some("||"),
            Operator::Eq => Some("==="),
            Operator::NotEq => Some("!=="),
            Operator::Concat => Some("+"),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operand count did not match the operator's arity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operator `{operator}` takes {expected} operand(s), got {found}")]
pub struct ArityError {
    /// The operator being constructed.
    pub operator: Operator,
    /// What the operator accepts.
    pub expected: Arity,
    /// How many operands were supplied.
    pub found: usize,
}

impl ArityError {
    /// Check `found` operands against `operator`.
    pub fn check(operator: Operator, found: usize) -> Result<(), ArityError> {
        let expected = operator.arity();
        if expected.accepts(found) {
            Ok(())
        } else {
            Err(ArityError {
                operator,
                expected,
                found,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Expr
// ---------------------------------------------------------------------------

/// An immutable client expression node.
///
/// # Examples
///
/// ```ignore
/// let e = Expr::string("a").eq(Expr::ident("b")).not();
/// assert_eq!(e.render(), r#"(!("a" === b))"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal.
    String(String),
    /// Number literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// `null`.
    Null,
    /// A bare identifier (global or handler-local name).
    Identifier(String),
    /// Operator application. Built through [`Expr::operation`] or the
    /// operator methods, so the operand count always matches the arity.
    Operation(Operation),
    /// Function call.
    Call {
        /// The function being called.
        callee: Box<Expr>,
        /// Arguments, in order.
        args: Vec<Expr>,
    },
    /// Property access.
    Member {
        /// The object.
        object: Box<Expr>,
        /// The property name.
        property: String,
    },
    /// `await` of an asynchronous result.
    Await(Box<Expr>),
}

/// An operator with an operand list of matching length.
///
/// The fields are private: the only ways in are [`Expr::operation`], which
/// returns [`ArityError`] on a mismatch, and the fixed-arity operator methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    operator: Operator,
    operands: Vec<Expr>,
}

impl Operation {
    /// Check the operand count and build.
    pub fn new(operator: Operator, operands: Vec<Expr>) -> Result<Self, ArityError> {
        ArityError::check(operator, operands.len())?;
        Ok(Self { operator, operands })
    }

    /// Arity is guaranteed by the caller.
    pub(crate) fn unchecked(operator: Operator, operands: Vec<Expr>) -> Self {
        debug_assert!(operator.arity().accepts(operands.len()));
        Self { operator, operands }
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The operands, in order.
    pub fn operands(&self) -> &[Expr] {
        &self.operands
    }
}

/// Identifier bound to the caught error inside an error handler.
pub const CAUGHT_ERROR: &str = "error";

impl Expr {
    // -- literals -----------------------------------------------------------

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expr::String(value.into())
    }

    /// Number literal.
    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    /// Boolean literal.
    pub fn bool(value: bool) -> Self {
        Expr::Bool(value)
    }

    /// Identifier reference.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    // -- runtime references -------------------------------------------------

    /// Read the current client value of a reactive variable.
    pub fn variable(id: VariableId) -> Self {
        Self::runtime("get", vec![Expr::string(id.to_string())])
    }

    /// Read the current value of an input element.
    pub fn element_value(id: InstanceId) -> Self {
        Self::runtime("value", vec![Expr::string(id.to_string())])
    }

    /// Run the form validity check for the form enclosing `id`.
    pub fn form_valid(id: InstanceId) -> Self {
        Self::runtime("valid", vec![Expr::string(id.to_string())])
    }

    /// The error value inside an error handler.
    pub fn caught_error() -> Self {
        Expr::ident(CAUGHT_ERROR)
    }

    /// Call a function of the client library: `seed.<name>(args..)`.
    pub fn runtime(name: &str, args: Vec<Expr>) -> Self {
        Expr::ident("seed").method(name, args)
    }

    // -- operators ----------------------------------------------------------

    /// Apply `operator`, checking the operand count.
    pub fn operation(operator: Operator, operands: Vec<Expr>) -> Result<Self, ArityError> {
        Operation::new(operator, operands).map(Expr::Operation)
    }

    fn apply(operator: Operator, operands: Vec<Expr>) -> Self {
        Expr::Operation(Operation::unchecked(operator, operands))
    }

    /// Logical negation.
    pub fn not(self) -> Self {
        Self::apply(Operator::Not, vec![self])
    }

    /// Logical conjunction.
    pub fn and(self, other: Expr) -> Self {
        Self::apply(Operator::And, vec![self, other])
    }

    /// Logical disjunction.
    pub fn or(self, other: Expr) -> Self {
        Self::apply(Operator::Or, vec![self, other])
    }

    /// Strict equality.
    pub fn eq(self, other: Expr) -> Self {
        Self::apply(Operator::Eq, vec![self, other])
    }

    /// Strict inequality.
    pub fn not_eq(self, other: Expr) -> Self {
        Self::apply(Operator::NotEq, vec![self, other])
    }

    /// Whether this string contains `needle`.
    pub fn contains(self, needle: Expr) -> Self {
        Self::apply(Operator::Contains, vec![self, needle])
    }

    /// Concatenation.
    pub fn concat(self, other: Expr) -> Self {
        Self::apply(Operator::Concat, vec![self, other])
    }

    /// Convert to a string.
    pub fn as_string(self) -> Self {
        Self::apply(Operator::ToString, vec![self])
    }

    /// Convert to a number.
    pub fn as_number(self) -> Self {
        Self::apply(Operator::ToNumber, vec![self])
    }

    /// Convert to a boolean (truthiness).
    pub fn as_bool(self) -> Self {
        Self::apply(Operator::ToBool, vec![self])
    }

    // -- chains -------------------------------------------------------------

    /// Property access: `self.property`.
    pub fn member(self, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(self),
            property: property.into(),
        }
    }

    /// Call `self` as a function.
    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// Method call: `self.name(args..)`.
    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        self.member(name).call(args)
    }

    /// Await an asynchronous value.
    pub fn awaited(self) -> Self {
        Expr::Await(Box::new(self))
    }

    // -- rendering ----------------------------------------------------------

    /// Render as client code.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Append the client code for this expression to `out`.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Expr::String(s) => out.push_str(&escape::quote(s)),
            Expr::Number(n) => out.push_str(&escape::number(*n)),
            Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Expr::Null => out.push_str("null"),
            Expr::Identifier(name) => out.push_str(name),
            Expr::Operation(operation) => {
                render_operation(operation.operator, &operation.operands, out);
            }
            Expr::Call { callee, args } => {
                callee.render_receiver(out);
                out.push('(');
                render_list(args, out);
                out.push(')');
            }
            Expr::Member { object, property } => {
                object.render_receiver(out);
                out.push('.');
                out.push_str(property);
            }
            Expr::Await(inner) => {
                out.push_str("(await ");
                inner.render_into(out);
                out.push(')');
            }
        }
    }

    /// Render in receiver position (before `.` or `(`).
    ///
    /// A bare number literal followed by `.` would lex as a decimal point.
    fn render_receiver(&self, out: &mut String) {
        if let Expr::Number(n) = self {
            let text = escape::number(*n);
            if text.starts_with('(') {
                out.push_str(&text);
            } else {
                out.push('(');
                out.push_str(&text);
                out.push(')');
            }
        } else {
            self.render_into(out);
        }
    }
}

fn render_list(items: &[Expr], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.render_into(out);
    }
}

fn render_operation(operator: Operator, operands: &[Expr], out: &mut String) {
    match operator {
        Operator::Not => {
            out.push_str("(!");
            operands[0].render_into(out);
            out.push(')');
        }
        Operator::ToString | Operator::ToNumber | Operator::ToBool => {
            out.push_str(match operator {
                Operator::ToString => "String(",
                Operator::ToNumber => "Number(",
                _ => "Boolean(",
            });
            operands[0].render_into(out);
            out.push(')');
        }
        Operator::Contains => {
            operands[0].render_receiver(out);
            out.push_str(".includes(");
            operands[1].render_into(out);
            out.push(')');
        }
        _ => {
            let token = operator.infix().unwrap_or("&&");
            // ((a OP b) OP c) ...
            for _ in 1..operands.len() {
                out.push('(');
            }
            operands[0].render_into(out);
            for (i, operand) in operands.iter().enumerate().skip(1) {
                out.push(' ');
                out.push_str(token);
                out.push(' ');
                operand.render_into(out);
                if i + 1 < operands.len() {
                    out.push(')');
                }
            }
            if operands.len() > 1 {
                out.push(')');
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::string(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::String(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Number(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
