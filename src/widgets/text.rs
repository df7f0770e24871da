//! Text paragraphs, static or bound to a reactive value.

use crate::client::{bind_text, BindText, Value};
use crate::seed::{text, Seed, Text};

/// An empty paragraph.
pub fn new() -> Seed {
    Seed::new("p")
}

/// Fixed content.
pub fn set_string(content: impl Into<String>) -> Text {
    text(content)
}

/// Content that follows `value`.
pub fn set_to(value: impl Into<Value>) -> BindText {
    bind_text(value)
}
