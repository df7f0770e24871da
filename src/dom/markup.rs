//! HTML serialisation of a document subtree.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// How unmounted nodes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Omit unmounted subtrees entirely (what the live page shows).
    Live,
    /// Keep unmounted subtrees with a `hidden` attribute so the client can
    /// attach them later.
    Server,
}

/// Elements without a closing tag.
const VOID: &[&str] = &["input", "meta", "br", "img", "link"];

/// Serialise `start` and its descendants.
pub fn render(dom: &Dom, start: NodeId, mode: Mode) -> String {
    let mut out = String::new();
    render_node(dom, start, mode, &mut out);
    out
}

fn render_node(dom: &Dom, id: NodeId, mode: Mode, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    if !node.mounted && mode == Mode::Live {
        return;
    }

    out.push('<');
    out.push_str(&node.tag);
    write_attributes(node, mode, out);
    out.push('>');
    if VOID.contains(&node.tag.as_str()) {
        return;
    }

    if node.tag == "textarea" {
        escape_text(&node.value, out);
    } else if let Some(text) = &node.text {
        escape_text(text, out);
    }
    for &child in dom.children(id) {
        render_node(dom, child, mode, out);
    }

    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

fn write_attributes(node: &NodeData, mode: Mode, out: &mut String) {
    attribute(out, "id", &node.instance.to_string());
    if !node.classes.is_empty() {
        attribute(out, "class", &node.classes.join(" "));
    }
    if !node.styles.is_empty() {
        let style = node
            .styles
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        attribute(out, "style", &style);
    }
    for (name, value) in &node.attributes {
        attribute(out, name, value);
    }
    if node.tag == "input" && !node.value.is_empty() && !node.is_secret() {
        attribute(out, "value", &node.value);
    }
    if !node.mounted && mode == Mode::Server {
        out.push_str(" hidden");
    }
}

pub(crate) fn attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out.push('"');
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::SeedKind;
    use crate::id::InstanceId;

    fn tree() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body", SeedKind::App, InstanceId(0)));
        let mut p = NodeData::new("p", SeedKind::Element, InstanceId(1)).with_class("note");
        p.text = Some("a < b & c".into());
        p.set_style("color", "red");
        let p = dom.insert_child(root, p).unwrap();
        let mut input = NodeData::new("input", SeedKind::Element, InstanceId(2))
            .with_attribute("placeholder", "say \"hi\"");
        input.value = "typed".into();
        dom.insert_child(root, input).unwrap();
        (dom, root, p)
    }

    #[test]
    fn renders_attributes_and_escapes() {
        let (dom, root, _) = tree();
        insta::assert_snapshot!(
            render(&dom, root, Mode::Live),
            @r#"<body id="s0"><p id="s1" class="note" style="color: red">a &lt; b &amp; c</p><input id="s2" placeholder="say &quot;hi&quot;" value="typed"></body>"#
        );
    }

    #[test]
    fn live_mode_omits_unmounted() {
        let (mut dom, root, p) = tree();
        dom.get_mut(p).unwrap().mounted = false;
        let html = render(&dom, root, Mode::Live);
        assert!(!html.contains("s1"));
        assert!(html.contains("s2"));
    }

    #[test]
    fn server_mode_hides_unmounted() {
        let (mut dom, root, p) = tree();
        dom.get_mut(p).unwrap().mounted = false;
        let html = render(&dom, root, Mode::Server);
        assert!(html.contains(r#"<p id="s1" class="note" style="color: red" hidden>"#));
    }

    #[test]
    fn password_values_are_never_written() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body", SeedKind::App, InstanceId(0)));
        let mut input = NodeData::new("input", SeedKind::Element, InstanceId(1))
            .with_attribute("type", "password");
        input.value = "hunter2".into();
        dom.insert_child(root, input).unwrap();
        assert!(!render(&dom, root, Mode::Server).contains("hunter2"));
    }

    #[test]
    fn textarea_value_is_content() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("textarea", SeedKind::Element, InstanceId(0)));
        dom.get_mut(root).unwrap().value = "line".into();
        assert_eq!(
            render(&dom, root, Mode::Live),
            r#"<textarea id="s0">line</textarea>"#
        );
    }
}
