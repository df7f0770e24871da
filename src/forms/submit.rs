//! Submit button with in-flight state.

use crate::client::show_if;
use crate::js::{Expr, Script, Statement};
use crate::seed::{on_click, on_error, text, Apply, ComposeError, Context, Options, Seed};
use crate::widgets::{button, text as paragraph};

/// A button that validates the enclosing form, then runs `on_submit` with a
/// spinner in its place.
///
/// Apply it to the form. If the submit script throws, the message is shown
/// above the button and the button comes back.
#[derive(Debug, Clone)]
pub struct SubmitButton {
    title: String,
    theme: Options,
    theme_error: Options,
    on_submit: Script,
    spinner: Seed,
}

impl SubmitButton {
    /// A button labelled `title` running `on_submit`.
    pub fn new(title: impl Into<String>, on_submit: impl Into<Script>) -> Self {
        Self {
            title: title.into(),
            theme: Options::new(),
            theme_error: Options::new(),
            on_submit: on_submit.into(),
            spinner: button::spinner(),
        }
    }

    /// Options for the button (builder).
    pub fn with_theme(mut self, theme: Options) -> Self {
        self.theme = theme;
        self
    }

    /// Options for the error message (builder).
    pub fn with_error_theme(mut self, theme: Options) -> Self {
        self.theme_error = theme;
        self
    }

    /// Replace the busy indicator (builder).
    pub fn with_spinner(mut self, spinner: Seed) -> Self {
        self.spinner = spinner;
        self
    }
}

impl Apply for SubmitButton {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("SubmitButton")?;
        let form = cx.instance();
        let error = cx.document_mut().new_string("");
        let processing = cx.document_mut().new_bool(false);

        let mut submit = Script::new().then(processing.set(true));
        submit.extend(self.on_submit.clone());
        submit.push(processing.set(false));

        let click = Script::new()
            .then(error.set(""))
            .then(Statement::If {
                condition: Expr::form_valid(form),
                then: submit,
                otherwise: Script::new(),
            });

        let button = button::new()
            .with(text(self.title.clone()))
            .with(self.theme.clone())
            .with(on_error(|err| {
                Script::new()
                    .then(error.set(err.as_string()))
                    .then(processing.set(false))
            }))
            .with(on_click(click));

        cx.apply(
            &Options::new()
                .with(show_if(
                    &error,
                    [paragraph::new()
                        .with(paragraph::set_to(&error))
                        .with(self.theme_error.clone())],
                ))
                .with(show_if(processing.not(), [button]))
                .with(show_if(&processing, [self.spinner.clone()])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::document::Document;
    use crate::id::InstanceId;
    use crate::widgets::form;

    #[test]
    fn click_script_validates_then_toggles_processing() {
        let mut doc = Document::new(AppConfig::new("t"));
        let done = doc.new_bool(false);
        let body = doc.body();
        doc.apply(body, &form().with(SubmitButton::new("Go", done.set(true))))
            .unwrap();

        let button = doc.dom().query_by_tag("button")[0];
        let node = doc.node(button).unwrap();
        insta::assert_snapshot!(
            node.handlers_for("click").next().unwrap().render(),
            @r#"
        seed.set("v2", "");
        if (seed.valid("s1")) { seed.set("v3", true); seed.set("v1", true); seed.set("v3", false); }
        "#
        );
        assert_eq!(
            node.on_error.as_ref().unwrap().render(),
            "seed.set(\"v2\", String(error));\nseed.set(\"v3\", false);\n"
        );
    }

    #[test]
    fn gates_hang_off_the_form() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        doc.apply(body, &form().with(SubmitButton::new("Go", Script::new())))
            .unwrap();
        let form_id = InstanceId(1);
        let owned: usize = doc
            .hooks()
            .hooks()
            .filter(|h| h.owner == form_id)
            .count();
        // error and processing each trigger the form's render function
        assert_eq!(owned, 2);
        assert_eq!(doc.renderers().get(form_id).unwrap().len(), 3);
    }
}
