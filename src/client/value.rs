//! Reactive values: leaves, compounds and statics.
//!
//! A [`Value`] is what a hook watches and what a gate tests. Compound values
//! decompose to the set of leaf variables they read, so a single hook on a
//! compound fans out to one registration per leaf.

use std::collections::HashSet;

use crate::id::VariableId;
use crate::js::{ArityError, Expr, Operation, Operator};

use super::variable::Variable;

/// A value the client can compute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A reactive variable.
    Leaf(Variable),
    /// An operator applied to reactive operands.
    Compound(Compound),
    /// A constant; never triggers a re-render.
    Static(Expr),
}

impl Value {
    /// The client expression computing this value.
    pub fn expr(&self) -> Expr {
        match self {
            Value::Leaf(variable) => variable.read(),
            Value::Compound(compound) => compound.expr(),
            Value::Static(expr) => expr.clone(),
        }
    }

    /// Leaf variables, depth-first left-to-right, without duplicates.
    pub fn components(&self) -> Vec<Variable> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect(&mut out, &mut seen);
        out
    }

    fn collect(&self, out: &mut Vec<Variable>, seen: &mut HashSet<VariableId>) {
        match self {
            Value::Leaf(variable) => {
                if seen.insert(variable.id()) {
                    out.push(variable.clone());
                }
            }
            Value::Compound(compound) => {
                for operand in &compound.operands {
                    operand.collect(out, seen);
                }
            }
            Value::Static(_) => {}
        }
    }

    /// Whether a change to any variable can change this value.
    pub fn is_reactive(&self) -> bool {
        match self {
            Value::Leaf(_) => true,
            Value::Compound(compound) => compound.operands.iter().any(Value::is_reactive),
            Value::Static(_) => false,
        }
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<Compound> for Value {
    fn from(compound: Compound) -> Self {
        Value::Compound(compound)
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::Static(expr)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Static(Expr::bool(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Static(Expr::string(value))
    }
}

// ---------------------------------------------------------------------------
// Compound
// ---------------------------------------------------------------------------

/// An operator applied to [`Value`] operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    operator: Operator,
    operands: Vec<Value>,
}

impl Compound {
    /// Build a compound, checking the operand count.
    pub fn new(operator: Operator, operands: Vec<Value>) -> Result<Self, ArityError> {
        ArityError::check(operator, operands.len())?;
        Ok(Self { operator, operands })
    }

    /// Arity is guaranteed by the caller.
    pub(crate) fn unchecked(operator: Operator, operands: Vec<Value>) -> Self {
        debug_assert!(operator.arity().accepts(operands.len()));
        Self { operator, operands }
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The operands, in order.
    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    /// The client expression computing this compound.
    pub fn expr(&self) -> Expr {
        Expr::Operation(Operation::unchecked(
            self.operator,
            self.operands.iter().map(Value::expr).collect(),
        ))
    }

    /// Leaf variables this compound reads.
    pub fn components(&self) -> Vec<Variable> {
        Value::Compound(self.clone()).components()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
