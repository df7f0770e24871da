//! Reactive variables: named, typed client state.
//!
//! A [`Variable`] is allocated by the [`Document`](crate::document::Document)
//! and never changes identity. The typed handles ([`StringVar`], [`NumberVar`],
//! [`BoolVar`], [`Secret`]) are what application code holds; they produce
//! read expressions and write statements.

use crate::id::VariableId;
use crate::js::{Expr, Statement};

use super::op;
use super::value::Value;

// ---------------------------------------------------------------------------
// Kind / Literal / SecretParams
// ---------------------------------------------------------------------------

/// What a variable holds on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Bool,
    /// A string that may only leave the client hashed.
    Secret,
}

/// A literal initial value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String value.
    String(String),
    /// Number value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Literal {
    /// The literal as an expression.
    pub fn to_expr(&self) -> Expr {
        match self {
            Literal::String(s) => Expr::string(s.clone()),
            Literal::Number(n) => Expr::number(*n),
            Literal::Bool(b) => Expr::bool(*b),
        }
    }

    /// The zero value for a kind.
    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::String | Kind::Secret => Literal::String(String::new()),
            Kind::Number => Literal::Number(0.0),
            Kind::Bool => Literal::Bool(false),
        }
    }
}

/// Hashing parameters of a [`Secret`].
///
/// Only used to derive the one-way hash; the raw value is never stored
/// alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretParams {
    /// Application-wide pepper mixed into every hash.
    pub pepper: String,
    /// Iteration count (minimum 1).
    pub cpu: u32,
    /// Memory cost parameter, mixed into the first round.
    pub ram: u32,
}

impl SecretParams {
    /// Parameters with the given pepper and default costs.
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
            cpu: 8,
            ram: 64,
        }
    }

    /// Set the iteration count (builder).
    pub fn with_cpu(mut self, cpu: u32) -> Self {
        self.cpu = cpu;
        self
    }

    /// Set the memory cost (builder).
    pub fn with_ram(mut self, ram: u32) -> Self {
        self.ram = ram;
        self
    }
}

impl Default for SecretParams {
    fn default() -> Self {
        Self::new("")
    }
}

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// An untyped reactive variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    id: VariableId,
    kind: Kind,
    initial: Literal,
    secret: Option<SecretParams>,
}

impl Variable {
    pub(crate) fn new(
        id: VariableId,
        kind: Kind,
        initial: Literal,
        secret: Option<SecretParams>,
    ) -> Self {
        Self {
            id,
            kind,
            initial,
            secret,
        }
    }

    /// The client-side identifier.
    pub fn id(&self) -> VariableId {
        self.id
    }

    /// What this variable holds.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The value the client starts with.
    pub fn initial(&self) -> &Literal {
        &self.initial
    }

    /// Hashing parameters, for secret variables.
    pub fn secret_params(&self) -> Option<&SecretParams> {
        self.secret.as_ref()
    }

    /// Expression reading the current client value.
    pub(crate) fn read(&self) -> Expr {
        Expr::variable(self.id)
    }

    /// Statement writing a new value and re-rendering every hooked instance.
    pub(crate) fn write(&self, value: Expr) -> Statement {
        Statement::Set {
            variable: self.id,
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed handles
// ---------------------------------------------------------------------------

macro_rules! handle_common {
    ($name:ident) => {
        impl $name {
            /// The underlying variable.
            pub fn variable(&self) -> &Variable {
                &self.0
            }

            /// The client-side identifier.
            pub fn id(&self) -> VariableId {
                self.0.id
            }

            /// This variable as a reactive [`Value`].
            pub fn value(&self) -> Value {
                Value::Leaf(self.0.clone())
            }
        }

        impl From<&$name> for Value {
            fn from(handle: &$name) -> Self {
                handle.value()
            }
        }

        impl From<$name> for Value {
            fn from(handle: $name) -> Self {
                Value::Leaf(handle.0)
            }
        }
    };
}

/// A reactive string.
#[derive(Debug, Clone, PartialEq)]
pub struct StringVar(pub(crate) Variable);

handle_common!(StringVar);

impl StringVar {
    /// Read the current value.
    pub fn get(&self) -> Expr {
        self.0.read()
    }

    /// Write a new value.
    pub fn set(&self, value: impl Into<Expr>) -> Statement {
        self.0.write(value.into())
    }

    /// Whether the value contains `needle`.
    pub fn includes(&self, needle: impl Into<Expr>) -> Value {
        op::contains(self, Value::Static(needle.into()))
    }

    /// Truthiness (non-empty).
    pub fn is_set(&self) -> Value {
        op::to_bool(self)
    }
}

/// A reactive number.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberVar(pub(crate) Variable);

handle_common!(NumberVar);

impl NumberVar {
    /// Read the current value.
    pub fn get(&self) -> Expr {
        self.0.read()
    }

    /// Write a new value.
    pub fn set(&self, value: impl Into<Expr>) -> Statement {
        self.0.write(value.into())
    }

    /// The value converted to a string.
    pub fn to_text(&self) -> Value {
        op::to_string(self)
    }
}

/// A reactive boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolVar(pub(crate) Variable);

handle_common!(BoolVar);

impl BoolVar {
    /// Read the current value.
    pub fn get(&self) -> Expr {
        self.0.read()
    }

    /// Write a new value.
    pub fn set(&self, value: impl Into<Expr>) -> Statement {
        self.0.write(value.into())
    }

    /// Logical negation of this variable.
    pub fn not(&self) -> Value {
        op::not(self)
    }
}

/// A reactive secret (password).
///
/// There is no raw `get()`: the raw value can only take part in local
/// comparisons through [`Secret::value`], and can only leave the client as
/// [`Secret::hash`].
#[derive(Debug, Clone, PartialEq)]
pub struct Secret(pub(crate) Variable);

handle_common!(Secret);

impl Secret {
    /// The hashing parameters.
    pub fn params(&self) -> SecretParams {
        self.0.secret.clone().unwrap_or_default()
    }

    /// One-way hash of the current value.
    ///
    /// Renders `(await seed.hash(seed.get("vN"), "<pepper>", cpu, ram))`.
    pub fn hash(&self) -> Expr {
        let params = self.params();
        Expr::runtime(
            "hash",
            vec![
                self.0.read(),
                Expr::string(params.pepper),
                Expr::number(f64::from(params.cpu)),
                Expr::number(f64::from(params.ram)),
            ],
        )
        .awaited()
    }

    /// Write a new raw value (used by the password box binding).
    pub fn set(&self, value: impl Into<Expr>) -> Statement {
        self.0.write(value.into())
    }

    /// Truthiness (something has been typed).
    pub fn is_set(&self) -> Value {
        op::to_bool(self)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn var(n: u64, kind: Kind) -> Variable {
        Variable::new(VariableId(n), kind, Literal::zero(kind), None)
    }

    #[test]
    fn zero_values() {
        assert_eq!(Literal::zero(Kind::String), Literal::String(String::new()));
        assert_eq!(Literal::zero(Kind::Secret), Literal::String(String::new()));
        assert_eq!(Literal::zero(Kind::Number), Literal::Number(0.0));
        assert_eq!(Literal::zero(Kind::Bool), Literal::Bool(false));
    }

    #[test]
    fn get_and_set_render() {
        let s = StringVar(var(1, Kind::String));
        assert_eq!(s.get().render(), r#"seed.get("v1")"#);
        assert_eq!(s.set("hi").render(), r#"seed.set("v1", "hi");"#);
    }

    #[test]
    fn bool_set_and_not() {
        let b = BoolVar(var(2, Kind::Bool));
        assert_eq!(b.set(true).render(), r#"seed.set("v2", true);"#);
        assert_eq!(b.not().expr().render(), r#"(!seed.get("v2"))"#);
    }

    #[test]
    fn number_to_text_is_a_pure_wrap() {
        let n = NumberVar(var(3, Kind::Number));
        let text = n.to_text();
        assert_eq!(text.expr().render(), r#"String(seed.get("v3"))"#);
        assert_eq!(text.components(), vec![n.variable().clone()]);
    }

    #[test]
    fn secret_hash_expression() {
        let params = SecretParams::new("pepper").with_cpu(3).with_ram(16);
        let secret = Secret(Variable::new(
            VariableId(4),
            Kind::Secret,
            Literal::zero(Kind::Secret),
            Some(params),
        ));
        assert_eq!(
            secret.hash().render(),
            r#"(await seed.hash(seed.get("v4"), "pepper", 3, 16))"#
        );
    }

    #[test]
    fn includes_decomposes_to_the_string() {
        let s = StringVar(var(5, Kind::String));
        let v = s.includes("@");
        assert_eq!(v.expr().render(), r#"seed.get("v5").includes("@")"#);
        assert_eq!(v.components().len(), 1);
    }

    #[test]
    fn secret_params_builder() {
        let p = SecretParams::new("x").with_cpu(1).with_ram(2);
        assert_eq!(p.pepper, "x");
        assert_eq!(p.cpu, 1);
        assert_eq!(p.ram, 2);
    }
}
