//! Node types: NodeId, NodeData, SeedKind, Handler.

use std::collections::BTreeMap;
use std::fmt;

use slotmap::new_key_type;

use crate::id::InstanceId;
use crate::js::Script;

new_key_type! {
    /// Arena key of a document node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What role a seed plays in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedKind {
    /// The application root (`<body>`).
    App,
    /// A full-screen page.
    Page,
    /// A popup/dialog.
    Popup,
    /// A view inside a page.
    View,
    /// Any other element.
    Element,
}

impl SeedKind {
    /// Client event fired on a node of this kind when it is attached.
    pub fn show_event(self) -> &'static str {
        match self {
            SeedKind::Page | SeedKind::View => "enter",
            SeedKind::Popup => "show",
            SeedKind::App | SeedKind::Element => "visible",
        }
    }

    /// Client event fired on a node of this kind when it is detached.
    pub fn hide_event(self) -> &'static str {
        match self {
            SeedKind::Page | SeedKind::View => "exit",
            SeedKind::Popup => "hide",
            SeedKind::App | SeedKind::Element => "hidden",
        }
    }
}

impl fmt::Display for SeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedKind::App => "app",
            SeedKind::Page => "page",
            SeedKind::Popup => "popup",
            SeedKind::View => "view",
            SeedKind::Element => "element",
        })
    }
}

/// A client event handler attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    /// Event name (`input`, `change`, `click`, `enterkey`, ...).
    pub event: String,
    /// Statements run when the event fires.
    pub script: Script,
}

/// Data associated with a single document node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// HTML tag name.
    pub tag: String,
    /// Seed role.
    pub kind: SeedKind,
    /// Client-side id, rendered as the `id` attribute.
    pub instance: InstanceId,
    /// CSS classes, in insertion order.
    pub classes: Vec<String>,
    /// Inline style properties.
    pub styles: BTreeMap<String, String>,
    /// HTML attributes other than `id`, `class` and `style`.
    pub attributes: BTreeMap<String, String>,
    /// Text content.
    pub text: Option<String>,
    /// Current value of an input element.
    pub value: String,
    /// Whether the node is attached to the live document.
    pub mounted: bool,
    /// Event handlers, in registration order.
    pub handlers: Vec<Handler>,
    /// Runs when a handler on this node throws; `error` is bound.
    pub on_error: Option<Script>,
}

impl NodeData {
    /// Create a mounted node with no content.
    pub fn new(tag: impl Into<String>, kind: SeedKind, instance: InstanceId) -> Self {
        Self {
            tag: tag.into(),
            kind,
            instance,
            classes: Vec::new(),
            styles: BTreeMap::new(),
            attributes: BTreeMap::new(),
            text: None,
            value: String::new(),
            mounted: true,
            handlers: Vec::new(),
            on_error: None,
        }
    }

    /// Add a CSS class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_class(&class);
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Check whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a CSS class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Set a style property; the empty string removes it.
    pub fn set_style(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.styles.remove(property);
        } else {
            self.styles.insert(property.to_owned(), value.to_owned());
        }
    }

    /// Set an attribute; the empty string removes it.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.attributes.remove(name);
        } else {
            self.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Attribute value, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Add an event handler.
    pub fn on(&mut self, event: impl Into<String>, script: Script) {
        self.handlers.push(Handler {
            event: event.into(),
            script,
        });
    }

    /// Handlers registered for `event`, in order.
    pub fn handlers_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a Script> + 'a {
        self.handlers
            .iter()
            .filter(move |h| h.event == event)
            .map(|h| &h.script)
    }

    /// Whether this node takes user input.
    pub fn is_input(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea")
    }

    /// Whether enter-key navigation visits this node.
    pub fn is_focusable(&self) -> bool {
        self.is_input() || self.tag == "button"
    }

    /// Whether the value of this node must never be written to markup.
    pub fn is_secret(&self) -> bool {
        self.attribute("type") == Some("password")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str) -> NodeData {
        NodeData::new(tag, SeedKind::Element, InstanceId(1))
    }

    #[test]
    fn new_defaults() {
        let data = node("div");
        assert_eq!(data.tag, "div");
        assert!(data.mounted);
        assert!(data.classes.is_empty());
        assert!(data.text.is_none());
        assert!(data.on_error.is_none());
    }

    #[test]
    fn builder_with_class_dedup() {
        let data = node("div").with_class("a").with_class("a").with_class("b");
        assert_eq!(data.classes, vec!["a", "b"]);
    }

    #[test]
    fn remove_class() {
        let mut data = node("div").with_class("a").with_class("b");
        data.remove_class("a");
        assert!(!data.has_class("a"));
        assert!(data.has_class("b"));
        data.remove_class("missing");
    }

    #[test]
    fn empty_style_clears() {
        let mut data = node("p");
        data.set_style("color", "red");
        assert_eq!(data.styles.get("color").map(String::as_str), Some("red"));
        data.set_style("color", "");
        assert!(data.styles.is_empty());
    }

    #[test]
    fn empty_attribute_clears() {
        let mut data = node("input").with_attribute("required", "required");
        assert_eq!(data.attribute("required"), Some("required"));
        data.set_attribute("required", "");
        assert_eq!(data.attribute("required"), None);
    }

    #[test]
    fn handlers_filter_by_event() {
        let mut data = node("button");
        data.on("click", Script::new());
        data.on("input", Script::new());
        data.on("click", Script::new());
        assert_eq!(data.handlers_for("click").count(), 2);
        assert_eq!(data.handlers_for("change").count(), 0);
    }

    #[test]
    fn focusable_tags() {
        assert!(node("input").is_focusable());
        assert!(node("textarea").is_input());
        assert!(node("button").is_focusable());
        assert!(!node("button").is_input());
        assert!(!node("p").is_focusable());
    }

    #[test]
    fn password_is_secret() {
        assert!(node("input").with_attribute("type", "password").is_secret());
        assert!(!node("input").with_attribute("type", "text").is_secret());
    }

    #[test]
    fn lifecycle_event_names() {
        assert_eq!(SeedKind::Page.show_event(), "enter");
        assert_eq!(SeedKind::View.hide_event(), "exit");
        assert_eq!(SeedKind::Popup.show_event(), "show");
        assert_eq!(SeedKind::Popup.hide_event(), "hide");
        assert_eq!(SeedKind::Element.show_event(), "visible");
        assert_eq!(SeedKind::Element.hide_event(), "hidden");
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
