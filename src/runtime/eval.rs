//! Expression evaluation with client-language semantics.

use crate::client::{hash_secret, SecretParams};
use crate::id::InstanceId;

use super::parser::{Ast, BinaryOp, ParseError, UnaryOp};
use super::value::JsValue;

/// Errors raised while running client code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// Emitted code did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A `throw` that nothing caught.
    #[error("uncaught {0}")]
    Thrown(JsValue),
    /// A name with no binding.
    #[error("{0} is not defined")]
    Reference(String),
    /// A call to something the runtime does not provide.
    #[error("{0} is not a function")]
    UnknownFunction(String),
    /// An operation on a value of the wrong type.
    #[error("type error: {0}")]
    Type(String),
    /// Render functions kept triggering each other.
    #[error("render of {0} exceeded the nesting limit")]
    RenderDepth(InstanceId),
}

impl ScriptError {
    /// The value a `catch` clause would see.
    pub fn into_thrown(self) -> JsValue {
        match self {
            ScriptError::Thrown(value) => value,
            other => JsValue::String(other.to_string()),
        }
    }
}

/// What evaluation can see of the client.
pub trait Env {
    /// `seed.get(id)`.
    fn variable(&self, id: &str) -> JsValue;
    /// `seed.value(id)`.
    fn element_value(&self, id: &str) -> JsValue;
    /// `seed.valid(id)`.
    fn form_valid(&self, id: &str) -> bool;
    /// Any other free name (the caught `error`, for instance).
    fn lookup(&self, name: &str) -> Option<JsValue>;
}

/// Evaluate `ast` against `env`.
pub fn evaluate(ast: &Ast, env: &dyn Env) -> Result<JsValue, ScriptError> {
    match ast {
        Ast::Literal(value) => Ok(value.clone()),
        Ast::Identifier(name) => env
            .lookup(name)
            .ok_or_else(|| ScriptError::Reference(name.clone())),
        Ast::Unary(op, operand) => {
            let value = evaluate(operand, env)?;
            Ok(match op {
                UnaryOp::Not => JsValue::Bool(!value.truthy()),
                UnaryOp::Neg => JsValue::Number(-value.to_number()),
            })
        }
        Ast::Binary(op, left, right) => binary(*op, left, right, env),
        Ast::Member(object, property) => {
            let object = evaluate(object, env)?;
            property_of(&object, property)
        }
        Ast::Call(callee, args) => call(callee, args, env),
        // Everything the runtime provides completes immediately.
        Ast::Await(inner) => evaluate(inner, env),
    }
}

fn binary(op: BinaryOp, left: &Ast, right: &Ast, env: &dyn Env) -> Result<JsValue, ScriptError> {
    let l = evaluate(left, env)?;
    let right = || evaluate(right, env);
    Ok(match op {
        // `&&` and `||` short-circuit and yield an operand, not a boolean.
        BinaryOp::And => {
            if l.truthy() {
                right()?
            } else {
                l
            }
        }
        BinaryOp::Or => {
            if l.truthy() {
                l
            } else {
                right()?
            }
        }
        BinaryOp::StrictEq => JsValue::Bool(l.strict_eq(&right()?)),
        BinaryOp::StrictNotEq => JsValue::Bool(!l.strict_eq(&right()?)),
        BinaryOp::LooseEq => JsValue::Bool(l.loose_eq(&right()?)),
        BinaryOp::LooseNotEq => JsValue::Bool(!l.loose_eq(&right()?)),
        BinaryOp::Add => {
            let r = right()?;
            match (&l, &r) {
                (JsValue::String(_), _) | (_, JsValue::String(_)) => {
                    JsValue::String(format!("{l}{r}"))
                }
                _ => JsValue::Number(l.to_number() + r.to_number()),
            }
        }
        BinaryOp::Sub => JsValue::Number(l.to_number() - right()?.to_number()),
    })
}

fn property_of(object: &JsValue, property: &str) -> Result<JsValue, ScriptError> {
    match object {
        JsValue::Undefined | JsValue::Null => Err(ScriptError::Type(format!(
            "cannot read property '{property}' of {object}"
        ))),
        JsValue::String(s) if property == "length" => {
            Ok(JsValue::Number(s.encode_utf16().count() as f64))
        }
        _ => Ok(JsValue::Undefined),
    }
}

fn call(callee: &Ast, args: &[Ast], env: &dyn Env) -> Result<JsValue, ScriptError> {
    let values = args
        .iter()
        .map(|arg| evaluate(arg, env))
        .collect::<Result<Vec<_>, _>>()?;
    let arg = |i: usize| values.get(i).cloned().unwrap_or_default();

    match callee {
        Ast::Identifier(name) => match name.as_str() {
            "String" => Ok(JsValue::String(arg(0).to_string())),
            "Number" => Ok(JsValue::Number(if values.is_empty() {
                0.0
            } else {
                arg(0).to_number()
            })),
            "Boolean" => Ok(JsValue::Bool(arg(0).truthy())),
            _ => Err(ScriptError::UnknownFunction(name.clone())),
        },
        Ast::Member(object, method) => {
            if matches!(object.as_ref(), Ast::Identifier(name) if name == "seed") {
                return library(method, &values, env);
            }
            let receiver = evaluate(object, env)?;
            string_method(&receiver, method, &values)
        }
        other => Err(ScriptError::UnknownFunction(format!("{other:?}"))),
    }
}

/// Functions of the `seed` object usable inside expressions.
fn library(name: &str, args: &[JsValue], env: &dyn Env) -> Result<JsValue, ScriptError> {
    let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
    match name {
        "get" => Ok(env.variable(&arg(0).to_string())),
        "value" => Ok(env.element_value(&arg(0).to_string())),
        "valid" => Ok(JsValue::Bool(env.form_valid(&arg(0).to_string()))),
        "hash" => {
            let params = SecretParams::new(arg(1).to_string())
                .with_cpu(cost(&arg(2)))
                .with_ram(cost(&arg(3)));
            Ok(JsValue::String(hash_secret(&arg(0).to_string(), &params)))
        }
        _ => Err(ScriptError::UnknownFunction(format!("seed.{name}"))),
    }
}

/// A cost parameter as an unsigned integer (negative and NaN become 0).
fn cost(value: &JsValue) -> u32 {
    let n = value.to_number();
    if n.is_nan() || n <= 0.0 {
        0
    } else if n >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        n as u32
    }
}

fn string_method(receiver: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, ScriptError> {
    let JsValue::String(s) = receiver else {
        return Err(ScriptError::Type(format!(
            "{}.{name} is not a function",
            receiver.type_name()
        )));
    };
    let arg = |i: usize| args.get(i).map(ToString::to_string).unwrap_or_else(|| "undefined".into());
    Ok(match name {
        "includes" => JsValue::Bool(s.contains(arg(0).as_str())),
        "startsWith" => JsValue::Bool(s.starts_with(arg(0).as_str())),
        "endsWith" => JsValue::Bool(s.ends_with(arg(0).as_str())),
        "trim" => JsValue::String(s.trim().to_owned()),
        "toLowerCase" => JsValue::String(s.to_lowercase()),
        "toUpperCase" => JsValue::String(s.to_uppercase()),
        _ => return Err(ScriptError::UnknownFunction(format!("string.{name}"))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::parser::parse;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fixture {
        vars: HashMap<String, JsValue>,
        error: Option<JsValue>,
    }

    impl Env for Fixture {
        fn variable(&self, id: &str) -> JsValue {
            self.vars.get(id).cloned().unwrap_or_default()
        }
        fn element_value(&self, _id: &str) -> JsValue {
            JsValue::from("typed")
        }
        fn form_valid(&self, _id: &str) -> bool {
            true
        }
        fn lookup(&self, name: &str) -> Option<JsValue> {
            (name == "error").then(|| self.error.clone()).flatten()
        }
    }

    fn eval(src: &str, env: &Fixture) -> Result<JsValue, ScriptError> {
        evaluate(&parse(src)?, env)
    }

    #[test]
    fn logical_operators_return_operands() {
        let env = Fixture::default();
        assert_eq!(eval(r#"("" || "x")"#, &env).unwrap(), JsValue::from("x"));
        assert_eq!(eval(r#"("" && "x")"#, &env).unwrap(), JsValue::from(""));
        assert_eq!(eval("(!0)", &env).unwrap(), JsValue::Bool(true));
    }

    #[test]
    fn short_circuit_skips_the_right_side() {
        let env = Fixture::default();
        assert!(eval("(false && missing)", &env).is_ok());
        assert_eq!(
            eval("(true && missing)", &env),
            Err(ScriptError::Reference("missing".into()))
        );
    }

    #[test]
    fn concatenation_and_addition() {
        let env = Fixture::default();
        assert_eq!(eval(r#"("a" + 1)"#, &env).unwrap(), JsValue::from("a1"));
        assert_eq!(eval("(1 + true)", &env).unwrap(), JsValue::from(2.0));
    }

    #[test]
    fn runtime_functions() {
        let mut env = Fixture::default();
        env.vars.insert("v1".into(), JsValue::from("a@b"));
        assert_eq!(
            eval(r#"seed.get("v1").includes("@")"#, &env).unwrap(),
            JsValue::Bool(true)
        );
        assert_eq!(eval(r#"seed.value("s1")"#, &env).unwrap(), JsValue::from("typed"));
        assert_eq!(eval(r#"seed.get("v9")"#, &env).unwrap(), JsValue::Undefined);
    }

    #[test]
    fn hash_matches_the_library_function() {
        let env = Fixture::default();
        let expected = hash_secret("pw", &SecretParams::new("p").with_cpu(2).with_ram(8));
        assert_eq!(
            eval(r#"(await seed.hash("pw", "p", 2, 8))"#, &env).unwrap(),
            JsValue::String(expected)
        );
    }

    #[test]
    fn conversions() {
        let env = Fixture::default();
        assert_eq!(eval(r#"Number("2.5")"#, &env).unwrap(), JsValue::from(2.5));
        assert_eq!(eval("String(null)", &env).unwrap(), JsValue::from("null"));
        assert_eq!(eval(r#"Boolean("")"#, &env).unwrap(), JsValue::Bool(false));
        assert_eq!(eval(r#""héllo".length"#, &env).unwrap(), JsValue::from(5.0));
    }

    #[test]
    fn caught_error_binding() {
        let env = Fixture {
            error: Some(JsValue::from("boom")),
            ..Fixture::default()
        };
        assert_eq!(eval("String(error)", &env).unwrap(), JsValue::from("boom"));
    }

    #[test]
    fn type_errors() {
        let env = Fixture::default();
        assert!(matches!(eval("undefined.x", &env), Err(ScriptError::Type(_))));
        assert!(matches!(eval("(1).includes(2)", &env), Err(ScriptError::Type(_))));
        assert_eq!(
            eval("seed.nope()", &env),
            Err(ScriptError::UnknownFunction("seed.nope".into()))
        );
    }

    #[test]
    fn thrown_values_survive_catching() {
        assert_eq!(
            ScriptError::Thrown(JsValue::from("x")).into_thrown(),
            JsValue::from("x")
        );
        assert_eq!(
            ScriptError::Reference("y".into()).into_thrown(),
            JsValue::from("y is not defined")
        );
    }
}
