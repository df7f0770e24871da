//! Operators over reactive values.
//!
//! Every function here returns a [`Value::Compound`], so hooks placed on the
//! result register against each leaf it reads. Conversions are compounds too.

use crate::js::{ArityError, Operator};

use super::value::{Compound, Value};

fn unary(operator: Operator, operand: impl Into<Value>) -> Value {
    Value::Compound(Compound::unchecked(operator, vec![operand.into()]))
}

fn binary(operator: Operator, left: impl Into<Value>, right: impl Into<Value>) -> Value {
    Value::Compound(Compound::unchecked(
        operator,
        vec![left.into(), right.into()],
    ))
}

/// Logical negation.
pub fn not(value: impl Into<Value>) -> Value {
    unary(Operator::Not, value)
}

/// Logical conjunction.
pub fn and(left: impl Into<Value>, right: impl Into<Value>) -> Value {
    binary(Operator::And, left, right)
}

/// Logical disjunction.
pub fn or(left: impl Into<Value>, right: impl Into<Value>) -> Value {
    binary(Operator::Or, left, right)
}

/// Strict equality.
pub fn eq(left: impl Into<Value>, right: impl Into<Value>) -> Value {
    binary(Operator::Eq, left, right)
}

/// Strict inequality.
pub fn not_eq(left: impl Into<Value>, right: impl Into<Value>) -> Value {
    binary(Operator::NotEq, left, right)
}

/// Whether `haystack` contains `needle`.
pub fn contains(haystack: impl Into<Value>, needle: impl Into<Value>) -> Value {
    binary(Operator::Contains, haystack, needle)
}

/// String conversion.
pub fn to_string(value: impl Into<Value>) -> Value {
    unary(Operator::ToString, value)
}

/// Number conversion.
pub fn to_number(value: impl Into<Value>) -> Value {
    unary(Operator::ToNumber, value)
}

/// Boolean conversion.
pub fn to_bool(value: impl Into<Value>) -> Value {
    unary(Operator::ToBool, value)
}

/// Conjunction of any number of values.
pub fn all(values: Vec<Value>) -> Result<Value, ArityError> {
    Ok(Value::Compound(Compound::new(Operator::And, values)?))
}

/// Disjunction of any number of values.
pub fn any(values: Vec<Value>) -> Result<Value, ArityError> {
    Ok(Value::Compound(Compound::new(Operator::Or, values)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::variable::{Kind, Literal, Variable};
    use crate::id::VariableId;

    fn leaf(n: u64) -> Value {
        Value::Leaf(Variable::new(
            VariableId(n),
            Kind::String,
            Literal::zero(Kind::String),
            None,
        ))
    }

    #[test]
    fn and_of_not() {
        let v = and(not(leaf(1)), leaf(2));
        assert_eq!(
            v.expr().render(),
            r#"((!seed.get("v1")) && seed.get("v2"))"#
        );
        assert_eq!(v.components().len(), 2);
    }

    #[test]
    fn not_eq_between_leaves() {
        let v = not_eq(leaf(1), leaf(2));
        assert_eq!(v.expr().render(), r#"(seed.get("v1") !== seed.get("v2"))"#);
    }

    #[test]
    fn all_checks_arity() {
        assert!(all(vec![leaf(1)]).is_err());
        let v = all(vec![leaf(1), leaf(2), leaf(3)]).unwrap();
        assert_eq!(
            v.expr().render(),
            r#"((seed.get("v1") && seed.get("v2")) && seed.get("v3"))"#
        );
    }

    #[test]
    fn any_folds_left() {
        let v = any(vec![leaf(1), leaf(2)]).unwrap();
        assert_eq!(v.expr().render(), r#"(seed.get("v1") || seed.get("v2"))"#);
    }

    #[test]
    fn conversions_keep_components() {
        let v = to_number(leaf(7));
        assert_eq!(v.expr().render(), r#"Number(seed.get("v7"))"#);
        assert_eq!(v.components()[0].id(), VariableId(7));
    }
}
