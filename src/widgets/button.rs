//! Buttons and the busy spinner.

use crate::seed::{attr, class, text, Seed};

/// A button. `type="button"` keeps the browser from submitting the form
/// natively; submission goes through click handlers.
pub fn new() -> Seed {
    Seed::new("button").with(attr("type", "button"))
}

/// A button with a label.
pub fn labelled(label: impl Into<String>) -> Seed {
    new().with(text(label))
}

/// Busy indicator shown while a form is processing.
pub fn spinner() -> Seed {
    Seed::new("div")
        .with(class("spinner"))
        .with(attr("role", "status"))
}
