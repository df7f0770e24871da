//! Gates: conditional application of options and children, and reactive
//! text.
//!
//! A gate hooks its target on every leaf of the condition and appends a
//! branch to the target's render function. The client re-evaluates the
//! condition on each render, so the latest values of all leaves always
//! decide the branch.

use std::rc::Rc;

use crate::js::{Script, Statement};
use crate::seed::{Apply, ComposeError, Context, Phase, Seed};

use super::value::Value;

// ---------------------------------------------------------------------------
// render_if
// ---------------------------------------------------------------------------

/// Options applied while a condition holds. See [`render_if`].
#[derive(Clone)]
pub struct RenderIf {
    condition: Value,
    options: Rc<dyn Apply>,
}

/// Apply `options` to the target while `condition` is truthy, and revert
/// them while it is not.
pub fn render_if(condition: impl Into<Value>, options: impl Apply + 'static) -> RenderIf {
    RenderIf {
        condition: condition.into(),
        options: Rc::new(options),
    }
}

impl RenderIf {
    fn branches(&self, cx: &mut Context<'_>) -> Result<(Script, Script), ComposeError> {
        let then = cx.collect(Phase::Client, self.options.as_ref())?;
        let otherwise = cx.collect(Phase::Undo, self.options.as_ref())?;
        Ok((then, otherwise))
    }
}

impl Apply for RenderIf {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        match cx.phase() {
            Phase::Build => {
                let (then, otherwise) = self.branches(cx)?;
                let statement = Statement::If {
                    condition: self.condition.expr(),
                    then,
                    otherwise,
                };
                cx.bind(&self.condition, statement);
            }
            Phase::Client => {
                let (then, otherwise) = self.branches(cx)?;
                cx.emit(Statement::If {
                    condition: self.condition.expr(),
                    then,
                    otherwise,
                });
            }
            Phase::Undo => {
                let undo = cx.collect(Phase::Undo, self.options.as_ref())?;
                for statement in undo {
                    cx.emit(statement);
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// show_if
// ---------------------------------------------------------------------------

/// Children attached only while a condition holds. See [`show_if`].
#[derive(Debug, Clone)]
pub struct ShowIf {
    condition: Value,
    children: Vec<Seed>,
}

/// Build `children` under the target, attached to the live document only
/// while `condition` is truthy.
pub fn show_if(condition: impl Into<Value>, children: impl IntoIterator<Item = Seed>) -> ShowIf {
    ShowIf {
        condition: condition.into(),
        children: children.into_iter().collect(),
    }
}

impl Apply for ShowIf {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("show_if")?;
        let mut mount = Script::new();
        let mut unmount = Script::new();
        for child in &self.children {
            let node = cx.add_child(child)?;
            let instance = cx
                .document()
                .node(node)
                .map(|n| n.instance)
                .ok_or(ComposeError::UnknownNode(node))?;
            mount.push(Statement::Mount(instance));
            unmount.push(Statement::Unmount(instance));
        }
        cx.bind(
            &self.condition,
            Statement::If {
                condition: self.condition.expr(),
                then: mount,
                otherwise: unmount,
            },
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// bind_text
// ---------------------------------------------------------------------------

/// Text content that follows a value. See [`bind_text`].
#[derive(Debug, Clone)]
pub struct BindText(Value);

/// Keep the target's text equal to `String(value)`.
pub fn bind_text(value: impl Into<Value>) -> BindText {
    BindText(value.into())
}

impl Apply for BindText {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        let target = cx.instance();
        let set = Statement::SetText {
            target,
            value: self.0.expr(),
        };
        match cx.phase() {
            Phase::Build => cx.bind(&self.0, set),
            Phase::Client => cx.emit(set),
            Phase::Undo => {
                let built = cx.node()?.text.clone().unwrap_or_default();
                cx.emit(Statement::SetText {
                    target,
                    value: built.into(),
                });
            }
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::client::op;
    use crate::document::Document;
    use crate::id::InstanceId;
    use crate::seed::{style, Options};
    use pretty_assertions::assert_eq;

    #[test]
    fn render_if_appends_both_branches_to_the_target() {
        let mut doc = Document::new(AppConfig::new("t"));
        let error = doc.new_bool(false);
        let body = doc.body();
        doc.apply(
            body,
            &Seed::new("input").with(render_if(&error, style("border-color", "red"))),
        )
        .unwrap();

        let input = InstanceId(1);
        assert_eq!(doc.hooks().owners(error.id()), &[input]);
        insta::assert_snapshot!(
            doc.renderers().get(input).unwrap().render(),
            @r#"if (seed.get("v1")) { seed.style("s1", "border-color", "red"); } else { seed.style("s1", "border-color", ""); }"#
        );
    }

    #[test]
    fn show_if_hooks_the_parent_and_mounts_children() {
        let mut doc = Document::new(AppConfig::new("t"));
        let a = doc.new_bool(false);
        let b = doc.new_bool(false);
        let body = doc.body();
        doc.apply(
            body,
            &Seed::new("div").with(show_if(op::and(&a, &b), [Seed::new("p"), Seed::new("span")])),
        )
        .unwrap();

        let div = InstanceId(1);
        assert_eq!(doc.hooks().owners(a.id()), &[div]);
        assert_eq!(doc.hooks().owners(b.id()), &[div]);
        insta::assert_snapshot!(
            doc.renderers().get(div).unwrap().render(),
            @r#"if ((seed.get("v1") && seed.get("v2"))) { seed.mount("s2"); seed.mount("s3"); } else { seed.unmount("s2"); seed.unmount("s3"); }"#
        );
    }

    #[test]
    fn show_if_is_build_only() {
        let mut doc = Document::new(AppConfig::new("t"));
        let flag = doc.new_bool(true);
        let body = doc.body();
        let mut cx = Context::new(&mut doc, body, Phase::Client).unwrap();
        let err = show_if(&flag, [Seed::new("p")]).apply(&mut cx).unwrap_err();
        assert_eq!(
            err,
            ComposeError::IncompatiblePhase {
                option: "show_if",
                phase: Phase::Client
            }
        );
    }

    #[test]
    fn nested_render_if_in_client_phase_emits_a_conditional() {
        let mut doc = Document::new(AppConfig::new("t"));
        let outer = doc.new_bool(false);
        let inner = doc.new_bool(false);
        let body = doc.body();
        let nested = Options::new().with(render_if(&inner, style("color", "red")));
        doc.apply(body, &Seed::new("p").with(render_if(&outer, nested)))
            .unwrap();
        let script = doc.renderers().get(InstanceId(1)).unwrap().render();
        assert!(script.starts_with(r#"if (seed.get("v1")) { if (seed.get("v2")) {"#));
        assert!(script.contains(r#"else { seed.style("s1", "color", ""); }"#));
    }

    #[test]
    fn bind_text_hooks_and_sets_text() {
        let mut doc = Document::new(AppConfig::new("t"));
        let message = doc.new_string("");
        let body = doc.body();
        doc.apply(body, &Seed::new("p").with(bind_text(&message))).unwrap();
        assert_eq!(doc.hooks().owners(message.id()), &[InstanceId(1)]);
        assert_eq!(
            doc.renderers().get(InstanceId(1)).unwrap().render(),
            "seed.text(\"s1\", seed.get(\"v1\"));\n"
        );
    }

    #[test]
    fn static_condition_registers_no_hook_but_still_renders() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        doc.apply(body, &Seed::new("p").with(render_if(true, style("color", "red"))))
            .unwrap();
        assert!(doc.hooks().is_empty());
        assert_eq!(doc.renderers().len(), 1);
    }
}
