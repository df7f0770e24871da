//! Generic options: styling, attributes, text, event handlers and error
//! routing.
//!
//! Styling options work in every phase, so they can sit inside a
//! [`render_if`](crate::client::render_if) gate. Handler options only make
//! sense while the document is built.

use std::rc::Rc;

use crate::client::StringVar;
use crate::js::{Expr, Script, Statement};

use super::context::{Apply, ComposeError, Context, Phase};

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// Inline style property. See [`style`].
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    property: String,
    value: String,
}

/// Set the inline style `property` to `value`.
pub fn style(property: impl Into<String>, value: impl Into<String>) -> Style {
    Style {
        property: property.into(),
        value: value.into(),
    }
}

impl Apply for Style {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        let target = cx.instance();
        match cx.phase() {
            Phase::Build => cx.node_mut()?.set_style(&self.property, &self.value),
            Phase::Client => cx.emit(Statement::SetStyle {
                target,
                property: self.property.clone(),
                value: Expr::string(self.value.clone()),
            }),
            Phase::Undo => {
                let built = cx.node()?.styles.get(&self.property).cloned();
                cx.emit(Statement::SetStyle {
                    target,
                    property: self.property.clone(),
                    value: Expr::string(built.unwrap_or_default()),
                });
            }
        }
        Ok(())
    }
}

/// CSS class. See [`class`].
#[derive(Debug, Clone, PartialEq)]
pub struct Class(String);

/// Add the CSS class `name`.
pub fn class(name: impl Into<String>) -> Class {
    Class(name.into())
}

impl Apply for Class {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        let target = cx.instance();
        match cx.phase() {
            Phase::Build => cx.node_mut()?.add_class(&self.0),
            Phase::Client => cx.emit(Statement::AddClass {
                target,
                class: self.0.clone(),
            }),
            Phase::Undo => {
                if !cx.node()?.has_class(&self.0) {
                    cx.emit(Statement::RemoveClass {
                        target,
                        class: self.0.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// HTML attribute. See [`attr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    name: String,
    value: String,
}

/// Set the attribute `name` to `value`.
pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Attr {
    Attr {
        name: name.into(),
        value: value.into(),
    }
}

/// Mark an input as required for form validation.
pub fn required() -> Attr {
    attr("required", "required")
}

impl Apply for Attr {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        let target = cx.instance();
        match cx.phase() {
            Phase::Build => cx.node_mut()?.set_attribute(&self.name, &self.value),
            Phase::Client => cx.emit(Statement::SetAttribute {
                target,
                name: self.name.clone(),
                value: Expr::string(self.value.clone()),
            }),
            Phase::Undo => {
                let built = cx.node()?.attribute(&self.name).map(str::to_owned);
                cx.emit(Statement::SetAttribute {
                    target,
                    name: self.name.clone(),
                    value: Expr::string(built.unwrap_or_default()),
                });
            }
        }
        Ok(())
    }
}

/// Static text content. See [`text`].
#[derive(Debug, Clone, PartialEq)]
pub struct Text(String);

/// Set the text content.
pub fn text(content: impl Into<String>) -> Text {
    Text(content.into())
}

impl Apply for Text {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        let target = cx.instance();
        match cx.phase() {
            Phase::Build => cx.node_mut()?.text = Some(self.0.clone()),
            Phase::Client => cx.emit(Statement::SetText {
                target,
                value: Expr::string(self.0.clone()),
            }),
            Phase::Undo => {
                let built = cx.node()?.text.clone();
                cx.emit(Statement::SetText {
                    target,
                    value: Expr::string(built.unwrap_or_default()),
                });
            }
        }
        Ok(())
    }
}

/// Conditional option. See [`when`].
#[derive(Clone)]
pub struct When {
    condition: bool,
    option: Rc<dyn Apply>,
}

/// Apply `option` only if `condition` holds when the document is composed.
pub fn when(condition: bool, option: impl Apply + 'static) -> When {
    When {
        condition,
        option: Rc::new(option),
    }
}

impl Apply for When {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        if self.condition {
            self.option.apply(cx)
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Client event handler. See [`on`].
#[derive(Debug, Clone, PartialEq)]
pub struct On {
    event: String,
    script: Script,
}

/// Run `script` when `event` fires on the target.
pub fn on(event: impl Into<String>, script: impl Into<Script>) -> On {
    On {
        event: event.into(),
        script: script.into(),
    }
}

/// Run `script` on every keystroke.
pub fn on_input(script: impl Into<Script>) -> On {
    on("input", script)
}

/// Run `script` when an edit is committed.
pub fn on_change(script: impl Into<Script>) -> On {
    on("change", script)
}

/// Run `script` on click.
pub fn on_click(script: impl Into<Script>) -> On {
    on("click", script)
}

/// Run `script` when the enter key is pressed.
pub fn on_enter_key(script: impl Into<Script>) -> On {
    on("enterkey", script)
}

/// Run `script` once the client has booted.
pub fn on_load(script: impl Into<Script>) -> On {
    on("load", script)
}

impl Apply for On {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("on")?;
        cx.node_mut()?.on(self.event.clone(), self.script.clone());
        Ok(())
    }
}

/// Which side of the lifecycle a [`Lifecycle`] handler runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Shown,
    Hidden,
}

/// Lifecycle handler. See [`on_enter`] and [`on_exit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    edge: Edge,
    script: Script,
}

/// Run `script` when the target is attached: `enter` for pages and views,
/// `show` for popups, `visible` for other elements.
pub fn on_enter(script: impl Into<Script>) -> Lifecycle {
    Lifecycle {
        edge: Edge::Shown,
        script: script.into(),
    }
}

/// Run `script` when the target is detached: `exit`, `hide` or `hidden`.
pub fn on_exit(script: impl Into<Script>) -> Lifecycle {
    Lifecycle {
        edge: Edge::Hidden,
        script: script.into(),
    }
}

impl Apply for Lifecycle {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("lifecycle handler")?;
        let node = cx.node_mut()?;
        let event = match self.edge {
            Edge::Shown => node.kind.show_event(),
            Edge::Hidden => node.kind.hide_event(),
        };
        node.on(event, self.script.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error handler. See [`on_error`] and [`catch`].
#[derive(Debug, Clone, PartialEq)]
pub struct OnError(Script);

/// Run the script built by `handler` when a handler on the target throws.
///
/// `handler` receives the expression naming the caught error.
pub fn on_error(handler: impl FnOnce(Expr) -> Script) -> OnError {
    OnError(handler(Expr::caught_error()))
}

/// Store the message of any error thrown on the target into `variable`.
pub fn catch(variable: &StringVar) -> OnError {
    on_error(|error| variable.set(error.as_string()).into())
}

impl Apply for OnError {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("on_error")?;
        cx.node_mut()?.on_error = Some(self.0.clone());
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
