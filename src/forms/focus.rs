//! Enter-key navigation between form fields.

use crate::js::Statement;
use crate::seed::{Apply, ComposeError, Context};

/// Enter-key handler. See [`focus_next_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusNextField;

/// On enter, click every button that follows the target in its form up to
/// the next input, and focus that input. With no input after it, focus the
/// last input of the form.
pub fn focus_next_field() -> FocusNextField {
    FocusNextField
}

impl Apply for FocusNextField {
    fn apply(&self, cx: &mut Context<'_>) -> Result<(), ComposeError> {
        cx.require_build("focus_next_field")?;
        let target = cx.instance();
        cx.node_mut()?
            .on("enterkey", Statement::FocusNext(target).into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::document::Document;
    use crate::id::InstanceId;
    use crate::widgets::input::textbox;

    #[test]
    fn registers_an_enterkey_handler() {
        let mut doc = Document::new(AppConfig::new("t"));
        let body = doc.body();
        doc.apply(body, &textbox().with(focus_next_field())).unwrap();
        let node = doc.node(doc.find(InstanceId(1)).unwrap()).unwrap();
        let script = node.handlers_for("enterkey").next().unwrap();
        assert_eq!(script.statements(), &[Statement::FocusNext(InstanceId(1))]);
    }
}
