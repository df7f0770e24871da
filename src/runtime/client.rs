//! Headless client: runs a document's behavior without a browser.
//!
//! [`Client`] takes a snapshot of a composed [`Document`] (tree, initial
//! values, hooks and render functions) and executes client statements
//! against it with the same semantics as the shipped library. Writes fire
//! hooks synchronously in registration order; detaching a fragment drops the
//! hooks its instances own, and attaching it again restores them and
//! re-renders the fragment.

use std::collections::HashMap;

use crate::client::{HookRegistry, Literal, RenderRegistry};
use crate::document::Document;
use crate::dom::{markup, Dom, Mode, NodeData, NodeId};
use crate::id::{InstanceId, VariableId};
use crate::js::{Expr, Script, Statement};

use super::eval::{self, Env, ScriptError};
use super::lifecycle::LifecycleTracker;
use super::parser;
use super::value::JsValue;

/// Render functions may trigger each other at most this deep.
const MAX_RENDER_DEPTH: usize = 64;

/// A running client.
#[derive(Debug)]
pub struct Client {
    dom: Dom,
    body: NodeId,
    by_instance: HashMap<InstanceId, NodeId>,
    values: HashMap<String, JsValue>,
    /// Hooks as composed; the source for re-registration on mount.
    composed: HookRegistry,
    /// Hooks of the attached part of the document.
    hooks: HookRegistry,
    renderers: RenderRegistry,
    focused: Option<InstanceId>,
    theme: Option<String>,
    caught: Vec<JsValue>,
    depth: usize,
    booting: bool,
    lifecycle: LifecycleTracker,
}

impl Client {
    /// Load `document` without running anything.
    pub fn new(document: &Document) -> Self {
        let dom = document.dom().clone();
        let body = document.body();
        let by_instance = dom
            .walk_depth_first(body)
            .into_iter()
            .filter_map(|node| dom.get(node).map(|data| (data.instance, node)))
            .collect();
        let values = document
            .variables()
            .map(|variable| (variable.id().to_string(), initial_value(variable.initial())))
            .collect();
        Self {
            dom,
            body,
            by_instance,
            values,
            composed: document.hooks().clone(),
            hooks: document.hooks().clone(),
            renderers: document.renderers().clone(),
            focused: None,
            theme: document.config().theme_color.clone(),
            caught: Vec::new(),
            depth: 0,
            booting: false,
            lifecycle: LifecycleTracker::new(),
        }
    }

    /// Load `document`, run every render function once in document order,
    /// then fire `load` handlers.
    pub fn boot(document: &Document) -> Result<Self, ScriptError> {
        let mut client = Self::prerender(document)?;
        for node in client.dom.walk_depth_first(client.body) {
            if client.is_live(node) {
                client.run_handlers(node, "load");
            }
        }
        tracing::debug!(nodes = client.by_instance.len(), "client booted");
        Ok(client)
    }

    /// Load `document` and run every render function once in document
    /// order. This is the state the server sends: `load` handlers have not
    /// run yet.
    pub fn prerender(document: &Document) -> Result<Self, ScriptError> {
        let mut client = Self::new(document);
        client.booting = true;
        for node in client.dom.walk_depth_first(client.body) {
            if let Some(instance) = client.dom.get(node).map(|data| data.instance) {
                client.render(instance)?;
            }
        }
        client.booting = false;
        Ok(client)
    }

    // -- state --------------------------------------------------------------

    /// Current value of a variable (`undefined` if unknown).
    pub fn get(&self, variable: VariableId) -> JsValue {
        self.values
            .get(&variable.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Write a variable and re-render every hooked instance, in registration
    /// order.
    pub fn set(&mut self, variable: VariableId, value: JsValue) -> Result<(), ScriptError> {
        tracing::trace!(%variable, %value, "set");
        self.values.insert(variable.to_string(), value);
        let owners = self.hooks.owners(variable).to_vec();
        for owner in owners {
            self.render(owner)?;
        }
        Ok(())
    }

    /// Evaluate an expression as the client would.
    pub fn evaluate(&self, expr: &Expr) -> Result<JsValue, ScriptError> {
        let ast = parser::parse(&expr.render())?;
        eval::evaluate(&ast, self)
    }

    /// Run a script.
    pub fn execute(&mut self, script: &Script) -> Result<(), ScriptError> {
        for statement in script.statements() {
            self.run(statement)?;
        }
        Ok(())
    }

    fn run(&mut self, statement: &Statement) -> Result<(), ScriptError> {
        tracing::trace!(%statement, "run");
        match statement {
            Statement::Set { variable, value } => {
                let value = self.evaluate(value)?;
                self.set(*variable, value)
            }
            Statement::Render(instance) => self.render(*instance),
            Statement::If {
                condition,
                then,
                otherwise,
            } => {
                if self.evaluate(condition)?.truthy() {
                    self.execute(then)
                } else {
                    self.execute(otherwise)
                }
            }
            Statement::SetText { target, value } => {
                let text = self.evaluate(value)?.to_string();
                self.patch(*target, |node| node.text = Some(text));
                Ok(())
            }
            Statement::SetStyle {
                target,
                property,
                value,
            } => {
                let value = self.evaluate(value)?.to_string();
                self.patch(*target, |node| node.set_style(property, &value));
                Ok(())
            }
            Statement::SetAttribute {
                target,
                name,
                value,
            } => {
                let value = self.evaluate(value)?.to_string();
                self.patch(*target, |node| node.set_attribute(name, &value));
                Ok(())
            }
            Statement::AddClass { target, class } => {
                self.patch(*target, |node| node.add_class(class));
                Ok(())
            }
            Statement::RemoveClass { target, class } => {
                self.patch(*target, |node| node.remove_class(class));
                Ok(())
            }
            Statement::Fill { target, value } => {
                let value = self.evaluate(value)?.to_string();
                self.patch(*target, |node| node.value = value);
                Ok(())
            }
            Statement::Mount(instance) => self.mount(*instance),
            Statement::Unmount(instance) => {
                self.unmount(*instance);
                Ok(())
            }
            Statement::Focus(instance) => {
                self.focus(*instance);
                Ok(())
            }
            Statement::FocusNext(instance) => {
                self.focus_next(*instance);
                Ok(())
            }
            Statement::Theme(value) => {
                self.theme = Some(self.evaluate(value)?.to_string());
                Ok(())
            }
            Statement::Throw(value) => Err(ScriptError::Thrown(self.evaluate(value)?)),
            Statement::Try { body, handler } => match self.execute(body) {
                Ok(()) => Ok(()),
                Err(error) => self.with_caught(error.into_thrown(), |client| client.execute(handler)),
            },
            Statement::Eval(value) => self.evaluate(value).map(drop),
        }
    }

    fn with_caught<T>(&mut self, error: JsValue, f: impl FnOnce(&mut Self) -> T) -> T {
        self.caught.push(error);
        let result = f(self);
        self.caught.pop();
        result
    }

    /// Apply `f` to the node of `instance`; unknown instances are skipped.
    fn patch(&mut self, instance: InstanceId, f: impl FnOnce(&mut NodeData)) {
        match self.node_id(instance).and_then(|node| self.dom.get_mut(node)) {
            Some(data) => f(data),
            None => tracing::debug!(%instance, "patch of unknown instance skipped"),
        }
    }

    // -- render dispatch ----------------------------------------------------

    /// Run the render function of `instance`.
    ///
    /// Unknown and detached instances are skipped: the tree may hold
    /// references to fragments that are gone or hidden.
    pub fn render(&mut self, instance: InstanceId) -> Result<(), ScriptError> {
        let Some(node) = self.node_id(instance) else {
            tracing::debug!(%instance, "render of unknown instance skipped");
            return Ok(());
        };
        if !self.is_live(node) {
            tracing::debug!(%instance, "render of detached instance skipped");
            return Ok(());
        }
        let Some(script) = self.renderers.get(instance).cloned() else {
            return Ok(());
        };
        if self.depth >= MAX_RENDER_DEPTH {
            return Err(ScriptError::RenderDepth(instance));
        }
        self.depth += 1;
        self.lifecycle.on_render(instance);
        let result = self.execute(&script);
        self.depth -= 1;
        result
    }

    /// Attach a fragment: restore its hooks, catch up its render functions
    /// and fire its show event. A no-op if it is attached already.
    fn mount(&mut self, instance: InstanceId) -> Result<(), ScriptError> {
        let Some(node) = self.node_id(instance) else {
            tracing::debug!(%instance, "mount of unknown instance skipped");
            return Ok(());
        };
        match self.dom.get_mut(node) {
            Some(data) if !data.mounted => data.mounted = true,
            _ => return Ok(()),
        }
        self.lifecycle.on_mount(instance);

        let fragment = self.instances_in(node);
        for &owner in &fragment {
            for variable in self.composed.triggers_of(owner) {
                self.hooks.register(variable, owner);
            }
        }
        if self.is_live(node) {
            for owner in fragment {
                self.render(owner)?;
            }
            self.fire_lifecycle(node, true);
        }
        Ok(())
    }

    /// Detach a fragment: drop its hooks, blur it and fire its hide event.
    /// A no-op if it is detached already.
    fn unmount(&mut self, instance: InstanceId) {
        let Some(node) = self.node_id(instance) else {
            tracing::debug!(%instance, "unmount of unknown instance skipped");
            return;
        };
        if !self.dom.get(node).is_some_and(|data| data.mounted) {
            return;
        }
        for owner in self.instances_in(node) {
            self.hooks.unregister_owner(owner);
            if self.focused == Some(owner) {
                self.focused = None;
            }
        }
        if let Some(data) = self.dom.get_mut(node) {
            data.mounted = false;
        }
        self.lifecycle.on_unmount(instance);
        self.fire_lifecycle(node, false);
    }

    /// Instances of the attached part of the subtree at `node`.
    fn instances_in(&self, node: NodeId) -> Vec<InstanceId> {
        self.dom
            .walk_filtered(node, |data| data.mounted)
            .into_iter()
            .filter_map(|id| self.dom.get(id).map(|data| data.instance))
            .collect()
    }

    fn fire_lifecycle(&mut self, node: NodeId, shown: bool) {
        if self.booting {
            return;
        }
        let Some(kind) = self.dom.get(node).map(|data| data.kind) else {
            return;
        };
        let event = if shown {
            kind.show_event()
        } else {
            kind.hide_event()
        };
        self.run_handlers(node, event);
    }

    // -- events -------------------------------------------------------------

    /// Fire `event` on `instance`. Returns false if the element is unknown or
    /// detached.
    ///
    /// Errors never escape: they go to the element's error handler, or are
    /// logged and dropped if it has none.
    pub fn dispatch(&mut self, instance: InstanceId, event: &str) -> bool {
        match self.node_id(instance) {
            Some(node) if self.is_live(node) => {
                self.run_handlers(node, event);
                true
            }
            _ => {
                tracing::debug!(%instance, event, "event on detached element dropped");
                false
            }
        }
    }

    fn run_handlers(&mut self, node: NodeId, event: &str) {
        let Some(data) = self.dom.get(node) else {
            return;
        };
        let instance = data.instance;
        let scripts: Vec<Script> = data.handlers_for(event).cloned().collect();
        let on_error = data.on_error.clone();
        for script in scripts {
            let Err(error) = self.execute(&script) else {
                continue;
            };
            let thrown = error.into_thrown();
            match &on_error {
                Some(handler) => {
                    if let Err(error) = self.with_caught(thrown, |client| client.execute(handler)) {
                        tracing::debug!(%instance, %error, "error handler failed");
                    }
                }
                None => tracing::debug!(%instance, error = %thrown, "uncaught client error"),
            }
        }
    }

    /// Replace the value of an input and fire `input`.
    pub fn input(&mut self, instance: InstanceId, text: &str) -> bool {
        let node = self.node_id(instance);
        if !node.is_some_and(|node| self.is_live(node)) {
            return false;
        }
        self.patch(instance, |data| data.value = text.to_owned());
        self.dispatch(instance, "input")
    }

    /// Fire `change` (the edit was committed).
    pub fn change(&mut self, instance: InstanceId) -> bool {
        self.dispatch(instance, "change")
    }

    /// Fire `click`.
    pub fn click(&mut self, instance: InstanceId) -> bool {
        self.dispatch(instance, "click")
    }

    /// Fire the enter-key event.
    pub fn press_enter(&mut self, instance: InstanceId) -> bool {
        self.dispatch(instance, "enterkey")
    }

    /// Move focus to `instance` if it is attached and focusable.
    pub fn focus(&mut self, instance: InstanceId) -> bool {
        let focusable = self
            .node_id(instance)
            .filter(|&node| self.is_live(node))
            .and_then(|node| self.dom.get(node))
            .is_some_and(NodeData::is_focusable);
        if focusable {
            self.focused = Some(instance);
        }
        focusable
    }

    /// Enter-key navigation within the enclosing form: click the buttons
    /// after `instance` up to the next input and focus that input, or focus
    /// the last input when none follows.
    fn focus_next(&mut self, instance: InstanceId) {
        let Some(current) = self.node_id(instance) else {
            return;
        };
        let scope = self.closest_form(current).unwrap_or(self.body);
        let fields: Vec<(InstanceId, bool)> = self
            .dom
            .walk_filtered(scope, |data| data.mounted)
            .into_iter()
            .filter_map(|node| self.dom.get(node))
            .filter(|data| data.is_focusable())
            .map(|data| (data.instance, data.tag == "button"))
            .collect();

        let mut found = false;
        let mut last = None;
        for (field, is_button) in fields {
            if !is_button {
                last = Some(field);
            }
            if found && is_button {
                self.click(field);
                continue;
            }
            if found {
                self.focus(field);
                found = false;
                break;
            }
            if field == instance {
                self.focused = None;
                found = true;
            }
        }
        if found {
            if let Some(last) = last {
                self.focus(last);
            }
        }
    }

    // -- queries ------------------------------------------------------------

    /// The node carrying `instance`.
    pub fn node_id(&self, instance: InstanceId) -> Option<NodeId> {
        self.by_instance.get(&instance).copied()
    }

    /// Node data of `instance`.
    pub fn node(&self, instance: InstanceId) -> Option<&NodeData> {
        self.node_id(instance).and_then(|node| self.dom.get(node))
    }

    /// The client's copy of the tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The body node.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Hooks of the attached part of the document.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Whether `instance` and all its ancestors are attached.
    pub fn is_mounted(&self, instance: InstanceId) -> bool {
        self.node_id(instance).is_some_and(|node| self.is_live(node))
    }

    fn is_live(&self, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(self.dom.ancestors(node))
            .all(|id| self.dom.get(id).is_some_and(|data| data.mounted))
    }

    /// The focused element.
    pub fn focused(&self) -> Option<InstanceId> {
        self.focused
    }

    /// The current theme color.
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// How many times `instance` has rendered.
    pub fn render_count(&self, instance: InstanceId) -> usize {
        self.lifecycle.render_count(instance)
    }

    /// Lifecycle events recorded so far.
    pub fn lifecycle(&mut self) -> &mut LifecycleTracker {
        &mut self.lifecycle
    }

    /// What the page shows: detached fragments are left out.
    pub fn html(&self) -> String {
        markup::render(&self.dom, self.body, Mode::Live)
    }

    /// The page with detached fragments kept as `hidden`.
    pub fn markup(&self) -> String {
        markup::render(&self.dom, self.body, Mode::Server)
    }

    fn resolve(&self, id: &str) -> Option<NodeId> {
        let index = id.strip_prefix('s')?.parse().ok()?;
        self.node_id(InstanceId(index))
    }

    /// The nearest `form` at or above `node`.
    fn closest_form(&self, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.dom.ancestors(node))
            .find(|&id| self.dom.get(id).is_some_and(|data| data.tag == "form"))
    }
}

impl Env for Client {
    fn variable(&self, id: &str) -> JsValue {
        self.values.get(id).cloned().unwrap_or_default()
    }

    fn element_value(&self, id: &str) -> JsValue {
        let value = self
            .resolve(id)
            .and_then(|node| self.dom.get(node))
            .map(|data| data.value.clone())
            .unwrap_or_default();
        JsValue::String(value)
    }

    fn form_valid(&self, id: &str) -> bool {
        let scope = self
            .resolve(id)
            .and_then(|node| self.closest_form(node))
            .unwrap_or(self.body);
        self.dom
            .walk_filtered(scope, |data| data.mounted)
            .into_iter()
            .filter_map(|node| self.dom.get(node))
            .filter(|data| data.is_input() && data.attribute("required").is_some())
            .all(|data| !data.value.is_empty())
    }

    fn lookup(&self, name: &str) -> Option<JsValue> {
        match name {
            "error" => self.caught.last().cloned(),
            _ => None,
        }
    }
}

fn initial_value(literal: &Literal) -> JsValue {
    match literal {
        Literal::String(s) => JsValue::String(s.clone()),
        Literal::Number(n) => JsValue::Number(*n),
        Literal::Bool(b) => JsValue::Bool(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::client::{op, render_if, show_if};
    use crate::runtime::lifecycle::LifecycleEvent;
    use crate::seed::{on_click, on_enter, on_error, on_exit, on_load, style, Seed};
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::new(AppConfig::new("t"))
    }

    #[test]
    fn boot_applies_initial_gate_state() {
        let mut d = doc();
        let shown = d.new_bool(true);
        let hidden = d.new_bool(false);
        let body = d.body();
        d.apply(
            body,
            &Seed::new("div")
                .with(show_if(&shown, [Seed::new("p")]))
                .with(show_if(&hidden, [Seed::new("span")])),
        )
        .unwrap();
        let client = Client::boot(&d).unwrap();
        assert_eq!(
            client.html(),
            r#"<body id="s0"><div id="s1"><p id="s2"></p></div></body>"#
        );
        assert!(!client.is_mounted(InstanceId(3)));
    }

    #[test]
    fn compound_gate_renders_once_per_leaf_change() {
        let mut d = doc();
        let a = d.new_bool(false);
        let b = d.new_bool(false);
        let body = d.body();
        d.apply(
            body,
            &Seed::new("p").with(render_if(op::and(&a, &b), style("color", "red"))),
        )
        .unwrap();
        let mut client = Client::boot(&d).unwrap();
        let p = InstanceId(1);
        assert_eq!(client.render_count(p), 1);

        client.set(a.id(), true.into()).unwrap();
        assert_eq!(client.render_count(p), 2);
        assert!(client.node(p).unwrap().styles.is_empty());

        client.set(b.id(), true.into()).unwrap();
        assert_eq!(client.render_count(p), 3);
        assert_eq!(client.node(p).unwrap().styles.get("color").unwrap(), "red");
    }

    #[test]
    fn unmount_drops_hooks_and_mount_restores_them() {
        let mut d = doc();
        let open = d.new_bool(true);
        let color = d.new_bool(false);
        let body = d.body();
        d.apply(
            body,
            &Seed::new("div").with(show_if(
                &open,
                [Seed::new("p").with(render_if(&color, style("color", "red")))],
            )),
        )
        .unwrap();
        let mut client = Client::boot(&d).unwrap();
        let p = InstanceId(2);
        assert_eq!(client.hooks().owners(color.id()), &[p]);

        client.set(open.id(), false.into()).unwrap();
        assert!(client.hooks().owners(color.id()).is_empty());
        let before = client.render_count(p);
        client.set(color.id(), true.into()).unwrap();
        assert_eq!(client.render_count(p), before);

        client.set(open.id(), true.into()).unwrap();
        assert_eq!(client.hooks().owners(color.id()), &[p]);
        // Catching up on mount applies the change made while detached.
        assert_eq!(client.node(p).unwrap().styles.get("color").unwrap(), "red");
    }

    #[test]
    fn render_of_unknown_instance_is_a_no_op() {
        let mut client = Client::boot(&doc()).unwrap();
        assert!(client.render(InstanceId(99)).is_ok());
        let html = client.html();
        client.render(InstanceId(0)).unwrap();
        assert_eq!(client.html(), html);
    }

    #[test]
    fn thrown_errors_reach_the_error_handler() {
        let mut d = doc();
        let message = d.new_string("");
        let body = d.body();
        d.apply(
            body,
            &Seed::new("button")
                .with(on_click(Statement::Throw(Expr::string("nope"))))
                .with(on_error(|err| message.set(err.as_string()).into())),
        )
        .unwrap();
        let mut client = Client::boot(&d).unwrap();
        assert!(client.click(InstanceId(1)));
        assert_eq!(client.get(message.id()), JsValue::from("nope"));
    }

    #[test]
    fn uncaught_errors_are_swallowed() {
        let mut d = doc();
        let body = d.body();
        d.apply(
            body,
            &Seed::new("button").with(on_click(Statement::Eval(Expr::ident("missing")))),
        )
        .unwrap();
        let mut client = Client::boot(&d).unwrap();
        assert!(client.click(InstanceId(1)));
    }

    #[test]
    fn lifecycle_events_follow_mounting() {
        let mut d = doc();
        let open = d.new_bool(false);
        let log = d.new_string("");
        let body = d.body();
        let page = Seed::new("section")
            .with_kind(crate::dom::SeedKind::Page)
            .with(on_enter(log.set("entered")))
            .with(on_exit(log.set("exited")));
        d.apply(body, &Seed::new("div").with(show_if(&open, [page])))
            .unwrap();
        let mut client = Client::boot(&d).unwrap();
        // Nothing fires while booting.
        assert_eq!(client.get(log.id()), JsValue::from(""));
        client.lifecycle().pending_events();

        client.set(open.id(), true.into()).unwrap();
        assert_eq!(client.get(log.id()), JsValue::from("entered"));
        client.set(open.id(), false.into()).unwrap();
        assert_eq!(client.get(log.id()), JsValue::from("exited"));

        let events: Vec<_> = client
            .lifecycle()
            .pending_events()
            .into_iter()
            .filter(|e| !matches!(e, LifecycleEvent::Render { .. }))
            .collect();
        assert_eq!(
            events,
            vec![
                LifecycleEvent::Mount { instance: InstanceId(2) },
                LifecycleEvent::Unmount { instance: InstanceId(2) },
            ]
        );
    }

    #[test]
    fn load_handlers_run_after_boot() {
        let mut d = doc();
        let ready = d.new_bool(false);
        let body = d.body();
        d.apply(body, &on_load(ready.set(true))).unwrap();
        let client = Client::boot(&d).unwrap();
        assert_eq!(client.get(ready.id()), JsValue::Bool(true));
    }

    #[test]
    fn runaway_renders_are_stopped() {
        let mut d = doc();
        let n = d.new_number(0.0);
        let bump = n.set(n.get().concat(Expr::number(1.0)));
        d.hook(&n.value(), InstanceId(0), bump);
        assert_eq!(
            Client::boot(&d).unwrap_err(),
            ScriptError::RenderDepth(InstanceId(0))
        );
    }
}
