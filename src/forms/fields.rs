//! Form fields.
//!
//! Every field follows the same pattern: a title, an input bound to the
//! caller's variable, and an error gate. A private error variable starts
//! empty, is cleared on every keystroke and is set by validation on change;
//! while it is set the input gets the `error_box` theme and the message is
//! shown under it.

use crate::client::{op, render_if, show_if, NumberVar, Secret, StringVar};
use crate::js::{Expr, Script, Statement};
use crate::seed::{
    catch, on_change, on_input, required, when, Apply, ComposeError, Context, Options, Seed,
};
use crate::widgets::{column, input, text};

use super::focus::focus_next_field;
use super::theme::FieldTheme;

/// Message reported by required text fields left empty.
pub const REQUIRED_MESSAGE: &str = "please fill out this field";
/// Message shown under an email field without an `@`.
pub const EMAIL_MESSAGE: &str = "please input a valid email address";
/// Message shown under a confirmation that differs from the password.
pub const MISMATCH_MESSAGE: &str = "this password is different from the one above";

// ---------------------------------------------------------------------------
// Shared parts
// ---------------------------------------------------------------------------

/// Throws [`REQUIRED_MESSAGE`] on change while the input is empty.
#[derive(Debug, Clone, Copy)]
struct CheckRequired;

impl Apply for CheckRequired {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("required check")?;
        let target = cx.instance();
        let check = Statement::If {
            condition: Expr::element_value(target).eq(Expr::string("")),
            then: Statement::Throw(Expr::string(REQUIRED_MESSAGE)).into(),
            otherwise: Script::new(),
        };
        cx.node_mut()?.on("change", check.into());
        Ok(())
    }
}

/// `required` attribute plus the empty check, when `enabled`.
fn required_check(enabled: bool) -> impl Apply {
    when(enabled, Options::new().with(required()).with(CheckRequired))
}

/// Title, input and error message stacked in a column.
fn field_column(
    theme: &FieldTheme,
    title: &str,
    field: Seed,
    error_gate: impl Apply + 'static,
) -> Seed {
    column()
        .with(theme.column.clone())
        .with(text::new().with(text::set_string(title)).with(theme.title.clone()))
        .with(field)
        .with(error_gate)
}

/// Error text bound to `error`, shown while it is non-empty.
fn error_message(theme: &FieldTheme, error: &StringVar) -> impl Apply {
    show_if(
        error,
        [text::new()
            .with(text::set_to(error))
            .with(theme.error_text.clone())],
    )
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// A titled text input with validation.
///
/// # Examples
///
/// ```ignore
/// let name = doc.new_string("");
/// form().with(TextField::new("Name", &name).required(true))
/// ```
#[derive(Debug, Clone)]
pub struct TextField {
    title: String,
    placeholder: String,
    update: StringVar,
    checker: Script,
    required: bool,
    multiline: bool,
    theme: FieldTheme,
}

impl TextField {
    /// A field titled `title` writing into `update`.
    pub fn new(title: impl Into<String>, update: &StringVar) -> Self {
        Self {
            title: title.into(),
            placeholder: String::new(),
            update: update.clone(),
            checker: Script::new(),
            required: false,
            multiline: false,
            theme: FieldTheme::default(),
        }
    }

    /// Set the placeholder (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Validation run on change; a `throw` becomes the field's error
    /// (builder).
    pub fn with_checker(mut self, checker: impl Into<Script>) -> Self {
        self.checker = checker.into();
        self
    }

    /// Whether the field must be filled in (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Use a textarea instead of a single-line box (builder).
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: FieldTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Apply for TextField {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("TextField")?;
        let error = cx.document_mut().new_string("");

        let (boxed, theme) = if self.multiline {
            (input::textarea(), &self.theme.area)
        } else {
            (input::textbox(), &self.theme.field)
        };
        let field = boxed
            .with(input::update(&self.update))
            .with(theme.clone())
            .with(input::placeholder(self.placeholder.clone()))
            .with(required_check(self.required))
            .with(render_if(&error, self.theme.error_box.clone()))
            .with(on_input(error.set("")))
            .with(catch(&error))
            .with(when(!self.checker.is_empty(), on_change(self.checker.clone())))
            .with(focus_next_field());

        let gate = error_message(&self.theme, &error);
        cx.apply(&field_column(&self.theme, &self.title, field, gate))
    }
}

// ---------------------------------------------------------------------------
// FloatField
// ---------------------------------------------------------------------------

/// A titled number input with validation.
#[derive(Debug, Clone)]
pub struct FloatField {
    title: String,
    placeholder: String,
    update: NumberVar,
    checker: Script,
    required: bool,
    theme: FieldTheme,
}

impl FloatField {
    /// A field titled `title` writing into `update`.
    pub fn new(title: impl Into<String>, update: &NumberVar) -> Self {
        Self {
            title: title.into(),
            placeholder: String::new(),
            update: update.clone(),
            checker: Script::new(),
            required: false,
            theme: FieldTheme::default(),
        }
    }

    /// Set the placeholder (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Validation run on change (builder).
    pub fn with_checker(mut self, checker: impl Into<Script>) -> Self {
        self.checker = checker.into();
        self
    }

    /// Whether the field must be filled in (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: FieldTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Apply for FloatField {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("FloatField")?;
        let error = cx.document_mut().new_string("");

        let field = input::numberbox()
            .with(input::update_number(&self.update))
            .with(self.theme.field.clone())
            .with(input::placeholder(self.placeholder.clone()))
            .with(required_check(self.required))
            .with(render_if(&error, self.theme.error_box.clone()))
            .with(on_input(error.set("")))
            .with(catch(&error))
            .with(when(!self.checker.is_empty(), on_change(self.checker.clone())))
            .with(focus_next_field());

        let gate = error_message(&self.theme, &error);
        cx.apply(&field_column(&self.theme, &self.title, field, gate))
    }
}

// ---------------------------------------------------------------------------
// EmailField
// ---------------------------------------------------------------------------

/// A titled email input that flags addresses without an `@`.
#[derive(Debug, Clone)]
pub struct EmailField {
    title: String,
    placeholder: String,
    update: StringVar,
    required: bool,
    theme: FieldTheme,
}

impl EmailField {
    /// A field titled `title` writing into `update`.
    pub fn new(title: impl Into<String>, update: &StringVar) -> Self {
        Self {
            title: title.into(),
            placeholder: String::new(),
            update: update.clone(),
            required: false,
            theme: FieldTheme::default(),
        }
    }

    /// Set the placeholder (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Whether the field must be filled in (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: FieldTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Apply for EmailField {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("EmailField")?;
        let error = cx.document_mut().new_bool(false);

        let check = error.set(self.update.get().contains(Expr::string("@")).not());
        // Only flag an address once something has been typed.
        let invalid = op::and(&error, &self.update);

        let field = input::emailbox()
            .with(input::update(&self.update))
            .with(self.theme.field.clone())
            .with(input::placeholder(self.placeholder.clone()))
            .with(when(self.required, required()))
            .with(render_if(invalid.clone(), self.theme.error_box.clone()))
            .with(on_input(error.set(false)))
            .with(on_change(check))
            .with(focus_next_field());

        let gate = show_if(
            invalid,
            [text::new()
                .with(text::set_string(EMAIL_MESSAGE))
                .with(self.theme.error_text.clone())],
        );
        cx.apply(&field_column(&self.theme, &self.title, field, gate))
    }
}

// ---------------------------------------------------------------------------
// PasswordField
// ---------------------------------------------------------------------------

/// A titled password input, optionally with a confirmation box.
#[derive(Debug, Clone)]
pub struct PasswordField {
    title: String,
    update: Secret,
    required: bool,
    confirm: bool,
    theme: FieldTheme,
}

impl PasswordField {
    /// A field writing into `update`, titled "Password".
    pub fn new(update: &Secret) -> Self {
        Self {
            title: String::new(),
            update: update.clone(),
            required: false,
            confirm: false,
            theme: FieldTheme::default(),
        }
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Whether the field must be filled in (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Add a second box that must match the first (builder).
    pub fn confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: FieldTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Apply for PasswordField {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("PasswordField")?;
        let error = cx.document_mut().new_string("");
        let title = if self.title.is_empty() {
            "Password"
        } else {
            self.title.as_str()
        };

        let field = input::passwordbox()
            .with(self.theme.field.clone())
            .with(input::update_secret(&self.update))
            .with(when(self.required, required()))
            .with(render_if(&error, self.theme.error_box.clone()))
            .with(on_input(error.set("")))
            .with(catch(&error))
            .with(focus_next_field());

        let mut seed = field_column(&self.theme, title, field, error_message(&self.theme, &error));

        if self.confirm {
            let confirmation = cx.document_mut().new_secret(self.update.params());
            let mismatched = op::not_eq(&self.update, &confirmation);
            let both_set = op::and(self.update.is_set(), confirmation.is_set());

            seed = seed
                .with(
                    text::new()
                        .with(text::set_string(format!("Confirm {title}")))
                        .with(self.theme.title.clone()),
                )
                .with(
                    input::passwordbox()
                        .with(self.theme.field.clone())
                        .with(input::update_secret(&confirmation))
                        .with(when(self.required, required()))
                        .with(render_if(mismatched.clone(), self.theme.error_box.clone()))
                        .with(focus_next_field()),
                )
                .with(show_if(
                    op::and(mismatched, both_set),
                    [text::new()
                        .with(text::set_string(MISMATCH_MESSAGE))
                        .with(self.theme.error_text.clone())],
                ));
        }

        cx.apply(&seed)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::client::SecretParams;
    use crate::document::Document;

    fn compose(build: impl FnOnce(&mut Document) -> Seed) -> Document {
        let mut doc = Document::new(AppConfig::new("t"));
        let seed = build(&mut doc);
        let body = doc.body();
        doc.apply(body, &seed).unwrap();
        doc
    }

    #[test]
    fn text_field_structure() {
        let doc = compose(|doc| {
            let name = doc.new_string("");
            crate::widgets::form().with(TextField::new("Name", &name).with_placeholder("Ada"))
        });
        let inputs = doc.dom().query_by_tag("input");
        assert_eq!(inputs.len(), 1);
        let input = doc.node(inputs[0]).unwrap();
        assert_eq!(input.attribute("placeholder"), Some("Ada"));
        assert!(input.on_error.is_some());
        assert!(doc.dom().query_by_text("Name").is_some());
        // update(name) + error gate on the input, error message gate on the column
        assert_eq!(doc.hooks().len(), 3);
    }

    #[test]
    fn required_text_field_checks_on_change() {
        let doc = compose(|doc| {
            let name = doc.new_string("");
            TextField::new("Name", &name).required(true).into_seed()
        });
        let input = doc.node(doc.dom().query_by_tag("input")[0]).unwrap();
        assert_eq!(input.attribute("required"), Some("required"));
        let change = input.handlers_for("change").next().unwrap().render();
        assert!(change.contains(REQUIRED_MESSAGE));
    }

    #[test]
    fn multiline_uses_textarea() {
        let doc = compose(|doc| {
            let bio = doc.new_string("");
            TextField::new("Bio", &bio).multiline(true).into_seed()
        });
        assert_eq!(doc.dom().query_by_tag("textarea").len(), 1);
        assert!(doc.dom().query_by_tag("input").is_empty());
    }

    #[test]
    fn password_confirmation_allocates_a_matching_secret() {
        let doc = compose(|doc| {
            let pw = doc.new_secret(SecretParams::new("pep").with_cpu(2));
            PasswordField::new(&pw).confirm(true).into_seed()
        });
        let secrets: Vec<_> = doc
            .variables()
            .filter_map(|v| v.secret_params().cloned())
            .collect();
        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets[0], secrets[1]);
        assert!(doc.dom().query_by_text("Confirm Password").is_some());
        assert_eq!(doc.dom().query_by_tag("input").len(), 2);
    }

    #[test]
    fn fields_are_build_only() {
        let mut doc = Document::new(AppConfig::new("t"));
        let name = doc.new_string("");
        let body = doc.body();
        let mut cx = Context::new(&mut doc, body, crate::seed::Phase::Client).unwrap();
        assert!(TextField::new("x", &name).apply(&mut cx).is_err());
    }

    impl TextField {
        fn into_seed(self) -> Seed {
            column().with(self)
        }
    }

    impl PasswordField {
        fn into_seed(self) -> Seed {
            column().with(self)
        }
    }
}
