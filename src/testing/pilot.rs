//! Pilot: programmatic interaction with a headless client.
//!
//! The `Pilot` boots a [`Client`] on a composed document and provides
//! methods to find elements the way a user would (by placeholder or label),
//! simulate typing and clicking, and inspect what the page shows.

use crate::app::App;
use crate::document::Document;
use crate::dom::NodeData;
use crate::id::{InstanceId, VariableId};
use crate::runtime::{Client, JsValue, ScriptError};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless page driver for testing.
///
/// # Examples
///
/// ```ignore
/// use seedling::testing::Pilot;
///
/// let mut pilot = Pilot::new(app.document())?;
/// pilot.fill_in("Email", "someone@example.com");
/// pilot.click_on("Sign up");
/// assert!(pilot.html().contains("Welcome"));
/// ```
pub struct Pilot {
    client: Client,
}

impl Pilot {
    /// Boot a client on `document`.
    pub fn new(document: &Document) -> Result<Self, ScriptError> {
        Ok(Self {
            client: Client::boot(document)?,
        })
    }

    /// Boot a client on an app's document.
    pub fn for_app(app: &App) -> Result<Self, ScriptError> {
        Self::new(app.document())
    }

    // -- queries ------------------------------------------------------------

    /// The first attached element (document order) whose placeholder is
    /// `placeholder`.
    pub fn find_by_placeholder(&self, placeholder: &str) -> Option<InstanceId> {
        self.find(|data| data.attribute("placeholder") == Some(placeholder))
    }

    /// The first attached element (document order) whose text is `text`.
    pub fn find_by_text(&self, text: &str) -> Option<InstanceId> {
        self.find(|data| data.text.as_deref() == Some(text))
    }

    /// Every attached element (document order) whose attribute `name` is
    /// `value`.
    pub fn find_all_by_attribute(&self, name: &str, value: &str) -> Vec<InstanceId> {
        self.find_all(|data| data.attribute(name) == Some(value))
    }

    fn find(&self, predicate: impl Fn(&NodeData) -> bool) -> Option<InstanceId> {
        self.find_all(predicate).into_iter().next()
    }

    fn find_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<InstanceId> {
        let dom = self.client.dom();
        dom.walk_filtered(self.client.body(), |data| data.mounted)
            .into_iter()
            .filter_map(|node| dom.get(node))
            .filter(|data| predicate(data))
            .map(|data| data.instance)
            .collect()
    }

    // -- input simulation -----------------------------------------------------

    /// Replace the text of an input, as one keystroke would.
    pub fn type_text(&mut self, instance: InstanceId, text: &str) -> bool {
        self.client.input(instance, text)
    }

    /// Commit an edit (the input loses focus).
    pub fn change(&mut self, instance: InstanceId) -> bool {
        self.client.change(instance)
    }

    /// Type into the input with `placeholder` and commit. Returns false if
    /// no attached input has that placeholder.
    pub fn fill_in(&mut self, placeholder: &str, text: &str) -> bool {
        let Some(instance) = self.find_by_placeholder(placeholder) else {
            return false;
        };
        self.client.focus(instance);
        self.type_text(instance, text) && self.change(instance)
    }

    /// Click an element.
    pub fn click(&mut self, instance: InstanceId) -> bool {
        self.client.click(instance)
    }

    /// Click the attached element labelled `text`.
    pub fn click_on(&mut self, text: &str) -> bool {
        match self.find_by_text(text) {
            Some(instance) => self.click(instance),
            None => false,
        }
    }

    /// Press enter in an element.
    pub fn press_enter(&mut self, instance: InstanceId) -> bool {
        self.client.press_enter(instance)
    }

    // -- inspection ---------------------------------------------------------

    /// Whether the element is attached, and so shown.
    pub fn is_visible(&self, instance: InstanceId) -> bool {
        self.client.is_mounted(instance)
    }

    /// Whether any attached element has `text`.
    pub fn shows_text(&self, text: &str) -> bool {
        self.find_by_text(text).is_some()
    }

    /// Text content of an element.
    pub fn text_of(&self, instance: InstanceId) -> Option<&str> {
        self.client.node(instance).and_then(|data| data.text.as_deref())
    }

    /// Current value of an input.
    pub fn value_of(&self, instance: InstanceId) -> Option<&str> {
        self.client.node(instance).map(|data| data.value.as_str())
    }

    /// Current value of a variable.
    pub fn get(&self, variable: VariableId) -> JsValue {
        self.client.get(variable)
    }

    /// What the page shows.
    pub fn html(&self) -> String {
        self.client.html()
    }

    /// The element with focus.
    pub fn focused(&self) -> Option<InstanceId> {
        self.client.focused()
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get a mutable reference to the underlying client.
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}
