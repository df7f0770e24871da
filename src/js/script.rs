//! Client statements and scripts.
//!
//! A [`Statement`] is one structured client action; [`Script`] is an ordered
//! list of them. Both render to text that is valid on its own inside an async
//! event-handler body.

use std::fmt;

use super::escape::quote;
use super::expr::{Expr, CAUGHT_ERROR};
use crate::id::{InstanceId, VariableId};

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// A single client statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Write a variable and fire every hook registered against it.
    Set {
        /// The variable being written.
        variable: VariableId,
        /// The new value.
        value: Expr,
    },
    /// Re-run the render function of an instance and patch its DOM.
    Render(InstanceId),
    /// Conditional.
    If {
        /// Truthiness decides the branch.
        condition: Expr,
        /// Runs when `condition` is truthy.
        then: Script,
        /// Runs otherwise.
        otherwise: Script,
    },
    /// Replace the text content of an element.
    SetText {
        /// Target element.
        target: InstanceId,
        /// New text (converted with `String(..)` on the client).
        value: Expr,
    },
    /// Set an inline style property.
    SetStyle {
        /// Target element.
        target: InstanceId,
        /// CSS property name.
        property: String,
        /// Property value; the empty string clears it.
        value: Expr,
    },
    /// Set an attribute. The empty string removes it.
    SetAttribute {
        /// Target element.
        target: InstanceId,
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: Expr,
    },
    /// Add a class to an element.
    AddClass {
        /// Target element.
        target: InstanceId,
        /// Class name.
        class: String,
    },
    /// Remove a class from an element.
    RemoveClass {
        /// Target element.
        target: InstanceId,
        /// Class name.
        class: String,
    },
    /// Set the value of an input element.
    Fill {
        /// Target input.
        target: InstanceId,
        /// New value.
        value: Expr,
    },
    /// Attach a guarded fragment to the live document.
    Mount(InstanceId),
    /// Detach a guarded fragment from the live document.
    Unmount(InstanceId),
    /// Move keyboard focus to an element.
    Focus(InstanceId),
    /// Enter-key navigation: click the following buttons and focus the next
    /// input of the enclosing form, wrapping to the last input.
    FocusNext(InstanceId),
    /// Change the document theme color.
    Theme(Expr),
    /// Raise a client error.
    Throw(Expr),
    /// Run `body`; if it raises, bind the error to `error` and run `handler`.
    Try {
        /// Protected statements.
        body: Script,
        /// Error handler.
        handler: Script,
    },
    /// Evaluate an expression for its side effects.
    Eval(Expr),
}

impl Statement {
    /// Render as client code.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Append the client code for this statement to `out`.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Statement::Set { variable, value } => {
                call(out, "set", &quote(&variable.to_string()), Some(value));
            }
            Statement::Render(id) => {
                out.push_str("await seed.render(");
                out.push_str(&quote(&id.to_string()));
                out.push_str(");");
            }
            Statement::If {
                condition,
                then,
                otherwise,
            } => {
                out.push_str("if (");
                condition.render_into(out);
                out.push_str(") { ");
                then.render_inline(out);
                out.push('}');
                if !otherwise.is_empty() {
                    out.push_str(" else { ");
                    otherwise.render_inline(out);
                    out.push('}');
                }
            }
            Statement::SetText { target, value } => {
                call(out, "text", &quote(&target.to_string()), Some(value));
            }
            Statement::SetStyle {
                target,
                property,
                value,
            } => {
                let head = format!("{}, {}", quote(&target.to_string()), quote(property));
                call(out, "style", &head, Some(value));
            }
            Statement::SetAttribute {
                target,
                name,
                value,
            } => {
                let head = format!("{}, {}", quote(&target.to_string()), quote(name));
                call(out, "attr", &head, Some(value));
            }
            Statement::AddClass { target, class } => {
                let head = format!("{}, {}", quote(&target.to_string()), quote(class));
                call(out, "addClass", &head, None);
            }
            Statement::RemoveClass { target, class } => {
                let head = format!("{}, {}", quote(&target.to_string()), quote(class));
                call(out, "removeClass", &head, None);
            }
            Statement::Fill { target, value } => {
                call(out, "fill", &quote(&target.to_string()), Some(value));
            }
            Statement::Mount(id) => call(out, "mount", &quote(&id.to_string()), None),
            Statement::Unmount(id) => call(out, "unmount", &quote(&id.to_string()), None),
            Statement::Focus(id) => call(out, "focus", &quote(&id.to_string()), None),
            Statement::FocusNext(id) => render_focus_next(*id, out),
            Statement::Theme(value) => {
                out.push_str("seed.theme(");
                value.render_into(out);
                out.push_str(");");
            }
            Statement::Throw(value) => {
                out.push_str("throw ");
                value.render_into(out);
                out.push(';');
            }
            Statement::Try { body, handler } => {
                out.push_str("try { ");
                body.render_inline(out);
                out.push_str("} catch (");
                out.push_str(CAUGHT_ERROR);
                out.push_str(") { ");
                handler.render_inline(out);
                out.push('}');
            }
            Statement::Eval(value) => {
                value.render_into(out);
                out.push(';');
            }
        }
    }
}

/// `seed.<name>(<head>[, <value>]);`
fn call(out: &mut String, name: &str, head: &str, value: Option<&Expr>) {
    out.push_str("seed.");
    out.push_str(name);
    out.push('(');
    out.push_str(head);
    if let Some(value) = value {
        out.push_str(", ");
        value.render_into(out);
    }
    out.push_str(");");
}

fn render_focus_next(id: InstanceId, out: &mut String) {
    out.push_str("{ let current = document.getElementById(");
    out.push_str(&quote(&id.to_string()));
    out.push_str(
        "); let form = current.closest(\"form\") || document; \
         let inputs = form.querySelectorAll(\"input, textarea, button\"); \
         let found = false; let last = null; \
         for (let input of inputs) { \
         if (input.closest(\"[hidden]\")) continue; \
         if (input.tagName != \"BUTTON\") last = input; \
         if (found && input.tagName == \"BUTTON\") { input.click(); continue; } \
         if (found) { input.focus(); found = false; break; } \
         if (input.id == current.id) { input.blur(); found = true; } } \
         if (found && last) last.focus(); }",
    );
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// An ordered list of client statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement (builder).
    pub fn then(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Append a statement.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Append every statement of `other`.
    pub fn extend(&mut self, other: Script) {
        self.statements.extend(other.statements);
    }

    /// The statements, in order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether there are no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Wrap this script so errors run `handler` instead of propagating.
    pub fn catching(self, handler: Script) -> Script {
        Script::new().then(Statement::Try {
            body: self,
            handler,
        })
    }

    /// Render with one statement per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            statement.render_into(&mut out);
            out.push('\n');
        }
        out
    }

    /// Render on a single line; each statement followed by a space.
    fn render_inline(&self, out: &mut String) {
        for statement in &self.statements {
            statement.render_into(out);
            out.push(' ');
        }
    }
}

impl From<Statement> for Script {
    fn from(statement: Statement) -> Self {
        Script::new().then(statement)
    }
}

impl FromIterator<Statement> for Script {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Script {
            statements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Script {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(n: u64) -> VariableId {
        VariableId(n)
    }

    fn s(n: u64) -> InstanceId {
        InstanceId(n)
    }

    #[test]
    fn set_statement() {
        let st = Statement::Set {
            variable: v(1),
            value: Expr::string("x"),
        };
        assert_eq!(st.render(), r#"seed.set("v1", "x");"#);
    }

    #[test]
    fn render_dispatch() {
        assert_eq!(
            Statement::Render(s(3)).render(),
            r#"await seed.render("s3");"#
        );
    }

    #[test]
    fn if_else() {
        let st = Statement::If {
            condition: Expr::variable(v(2)),
            then: Statement::Mount(s(4)).into(),
            otherwise: Statement::Unmount(s(4)).into(),
        };
        insta::assert_snapshot!(
            st.render(),
            @r#"if (seed.get("v2")) { seed.mount("s4"); } else { seed.unmount("s4"); }"#
        );
    }

    #[test]
    fn if_without_else() {
        let st = Statement::If {
            condition: Expr::bool(true),
            then: Statement::Focus(s(1)).into(),
            otherwise: Script::new(),
        };
        assert_eq!(st.render(), r#"if (true) { seed.focus("s1"); }"#);
    }

    #[test]
    fn style_and_class() {
        let st = Statement::SetStyle {
            target: s(1),
            property: "border-color".into(),
            value: Expr::string("red"),
        };
        assert_eq!(st.render(), r#"seed.style("s1", "border-color", "red");"#);
        let st = Statement::AddClass {
            target: s(1),
            class: "error".into(),
        };
        assert_eq!(st.render(), r#"seed.addClass("s1", "error");"#);
    }

    #[test]
    fn try_catch() {
        let st = Statement::Try {
            body: Statement::Throw(Expr::string("bad")).into(),
            handler: Statement::Set {
                variable: v(1),
                value: Expr::caught_error().as_string(),
            }
            .into(),
        };
        insta::assert_snapshot!(
            st.render(),
            @r#"try { throw "bad"; } catch (error) { seed.set("v1", String(error)); }"#
        );
    }

    #[test]
    fn focus_next_mentions_current_element() {
        let text = Statement::FocusNext(s(7)).render();
        assert!(text.starts_with(r#"{ let current = document.getElementById("s7");"#));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn focus_next_skips_detached_fields() {
        let text = Statement::FocusNext(s(1)).render();
        let skip = text
            .find(r#"if (input.closest("[hidden]")) continue;"#)
            .expect("detached fields are skipped");
        let first_use = text.find("last = input").unwrap();
        let click = text.find("input.click()").unwrap();
        assert!(skip < first_use && skip < click);
    }

    #[test]
    fn script_renders_one_statement_per_line() {
        let script = Script::new()
            .then(Statement::Render(s(1)))
            .then(Statement::Render(s(2)));
        assert_eq!(
            script.render(),
            "await seed.render(\"s1\");\nawait seed.render(\"s2\");\n"
        );
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn catching_wraps_in_try() {
        let script = Script::from(Statement::Throw(Expr::string("x")))
            .catching(Script::new());
        assert!(matches!(script.statements()[0], Statement::Try { .. }));
    }
}
