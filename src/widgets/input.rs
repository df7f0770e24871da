//! Input widgets and two-way variable binding.
//!
//! [`update`] keeps a variable and an input in sync: every keystroke writes
//! the input's value into the variable, and every write to the variable
//! refills the input.

use crate::client::{NumberVar, Secret, StringVar, Value, Variable};
use crate::js::{Expr, Statement};
use crate::seed::{attr, Apply, Attr, ComposeError, Context, Seed};

/// Single-line text input.
pub fn textbox() -> Seed {
    Seed::new("input").with(attr("type", "text"))
}

/// Multi-line text input.
pub fn textarea() -> Seed {
    Seed::new("textarea")
}

/// Numeric input.
pub fn numberbox() -> Seed {
    Seed::new("input").with(attr("type", "number"))
}

/// Email input.
pub fn emailbox() -> Seed {
    Seed::new("input").with(attr("type", "email"))
}

/// Password input. Its value is never written to markup.
pub fn passwordbox() -> Seed {
    Seed::new("input").with(attr("type", "password"))
}

/// Hint shown while the input is empty.
pub fn placeholder(text: impl Into<String>) -> Attr {
    attr("placeholder", text)
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// How the input's text is converted before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    None,
    Number,
}

/// Two-way binding between an input and a variable. See [`update`].
#[derive(Debug, Clone)]
pub struct Update {
    variable: Variable,
    conversion: Conversion,
}

/// Bind the input to a string variable.
pub fn update(variable: &StringVar) -> Update {
    Update {
        variable: variable.variable().clone(),
        conversion: Conversion::None,
    }
}

/// Bind the input to a number variable.
pub fn update_number(variable: &NumberVar) -> Update {
    Update {
        variable: variable.variable().clone(),
        conversion: Conversion::Number,
    }
}

/// Bind a password input to a secret.
pub fn update_secret(secret: &Secret) -> Update {
    Update {
        variable: secret.variable().clone(),
        conversion: Conversion::None,
    }
}

impl Apply for Update {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("update")?;
        let target = cx.instance();

        let mut read = Expr::element_value(target);
        if self.conversion == Conversion::Number {
            read = read.as_number();
        }
        let id = self.variable.id();
        let node = cx.node_mut()?;
        node.on(
            "input",
            Statement::Set {
                variable: id,
                value: read,
            }
            .into(),
        );
        if let Some(initial) = initial_text(&self.variable) {
            node.value = initial;
        }

        let leaf = Value::Leaf(self.variable.clone());
        let fill = Statement::Fill {
            target,
            value: leaf.expr(),
        };
        cx.bind(&leaf, fill);
        Ok(())
    }
}

/// Server-side value of the input, if any.
fn initial_text(variable: &Variable) -> Option<String> {
    use crate::client::Literal;

    match variable.initial() {
        Literal::String(s) if !s.is_empty() => Some(s.clone()),
        Literal::Number(n) => Some(crate::runtime::JsValue::Number(*n).to_string()),
        _ => None,
    }
}
