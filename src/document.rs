//! The document: element tree plus everything the client needs to run it.
//!
//! [`Document`] owns the DOM arena, the variable table, the hook registry
//! and the render functions. It allocates instance and variable ids from
//! per-document counters, so two documents never share state.

use std::collections::{BTreeMap, HashMap};

use crate::app::AppConfig;
use crate::client::{
    BoolVar, HookRegistry, Kind, Literal, NumberVar, RenderRegistry, Secret, SecretParams,
    StringVar, Value, Variable,
};
use crate::dom::{markup, Dom, Mode, NodeData, NodeId, SeedKind};
use crate::id::{InstanceId, VariableId};
use crate::js::{escape, Script, Statement};
use crate::seed::{Apply, ComposeError, Context, Phase};

/// A composed page.
#[derive(Debug, Clone)]
pub struct Document {
    dom: Dom,
    body: NodeId,
    by_instance: HashMap<InstanceId, NodeId>,
    next_instance: u64,
    next_variable: u64,
    variables: BTreeMap<VariableId, Variable>,
    hooks: HookRegistry,
    renderers: RenderRegistry,
    config: AppConfig,
}

impl Document {
    /// An empty document whose body is instance `s0`.
    pub fn new(config: AppConfig) -> Self {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body", SeedKind::App, InstanceId(0)));
        let mut by_instance = HashMap::new();
        by_instance.insert(InstanceId(0), body);
        Self {
            dom,
            body,
            by_instance,
            next_instance: 1,
            next_variable: 1,
            variables: BTreeMap::new(),
            hooks: HookRegistry::new(),
            renderers: RenderRegistry::new(),
            config,
        }
    }

    // -- tree ---------------------------------------------------------------

    /// The body node.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The element tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Node data, if the node exists.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.dom.get(id)
    }

    /// Mutable node data, if the node exists.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.dom.get_mut(id)
    }

    /// The node carrying client-side id `instance`.
    pub fn find(&self, instance: InstanceId) -> Option<NodeId> {
        self.by_instance.get(&instance).copied()
    }

    /// Create an element under `parent` with a fresh instance id.
    pub fn insert_child(&mut self, parent: NodeId, tag: &str, kind: SeedKind) -> Option<NodeId> {
        let instance = InstanceId(self.next_instance);
        let mut data = NodeData::new(tag, kind, instance);
        if matches!(kind, SeedKind::Page | SeedKind::View | SeedKind::Popup) {
            data.set_attribute("data-seed-show", kind.show_event());
            data.set_attribute("data-seed-hide", kind.hide_event());
        }
        let node = self.dom.insert_child(parent, data)?;
        self.next_instance += 1;
        self.by_instance.insert(instance, node);
        Some(node)
    }

    /// Remove a subtree, dropping the hooks and render functions its
    /// instances own. Returns how many nodes were removed.
    pub fn remove(&mut self, node: NodeId) -> usize {
        let removed = self.dom.remove(node);
        for data in &removed {
            self.by_instance.remove(&data.instance);
            self.hooks.unregister_owner(data.instance);
            self.renderers.remove(data.instance);
        }
        tracing::debug!(count = removed.len(), "removed subtree");
        removed.len()
    }

    /// Apply `option` to `target` in the build phase.
    pub fn apply(&mut self, target: NodeId, option: &dyn Apply) -> Result<(), ComposeError> {
        let mut cx = Context::new(self, target, Phase::Build)?;
        cx.apply(option)
    }

    /// The statements `option` emits for `target` in a client phase.
    pub fn emit(
        &mut self,
        target: NodeId,
        phase: Phase,
        option: &dyn Apply,
    ) -> Result<Script, ComposeError> {
        let mut cx = Context::new(self, target, phase)?;
        cx.apply(option)?;
        Ok(cx.into_script())
    }

    // -- variables ----------------------------------------------------------

    fn allocate(&mut self, kind: Kind, initial: Literal, secret: Option<SecretParams>) -> Variable {
        let id = VariableId(self.next_variable);
        self.next_variable += 1;
        let variable = Variable::new(id, kind, initial, secret);
        self.variables.insert(id, variable.clone());
        tracing::trace!(%id, ?kind, "allocated variable");
        variable
    }

    /// A new string variable.
    pub fn new_string(&mut self, initial: impl Into<String>) -> StringVar {
        StringVar(self.allocate(Kind::String, Literal::String(initial.into()), None))
    }

    /// A new number variable.
    pub fn new_number(&mut self, initial: f64) -> NumberVar {
        NumberVar(self.allocate(Kind::Number, Literal::Number(initial), None))
    }

    /// A new boolean variable.
    pub fn new_bool(&mut self, initial: bool) -> BoolVar {
        BoolVar(self.allocate(Kind::Bool, Literal::Bool(initial), None))
    }

    /// A new secret, initially empty.
    pub fn new_secret(&mut self, params: SecretParams) -> Secret {
        Secret(self.allocate(Kind::Secret, Literal::zero(Kind::Secret), Some(params)))
    }

    /// Every variable, by ascending id.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    // -- reactivity ---------------------------------------------------------

    /// Hook `owner` on `trigger` and append `statement` to its render
    /// function.
    ///
    /// A static trigger registers no hook; the statement still runs when the
    /// client boots.
    pub fn hook(&mut self, trigger: &Value, owner: InstanceId, statement: Statement) {
        self.hooks.hook(trigger, owner);
        self.renderers.append(owner, statement);
    }

    /// The hook registry.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// The render functions.
    pub fn renderers(&self) -> &RenderRegistry {
        &self.renderers
    }

    // -- config / output ----------------------------------------------------

    /// Application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable application configuration.
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Markup of the document as built (before any client code runs).
    pub fn markup(&self) -> String {
        markup::render(&self.dom, self.body, Mode::Server)
    }

    /// The behavior script: initial values, hook table, render functions and
    /// event handlers, followed by the boot call.
    pub fn behavior(&self) -> String {
        let mut out = String::new();

        let values: Vec<String> = self
            .variables
            .values()
            .map(|v| format!("{}: {}", escape::quote(&v.id().to_string()), v.initial().to_expr()))
            .collect();
        out.push_str(&format!("seed.values({{{}}});\n", values.join(", ")));

        let hooks: Vec<String> = self
            .hooks
            .variables()
            .map(|variable| {
                let owners: Vec<String> = self
                    .hooks
                    .owners(variable)
                    .iter()
                    .map(|o| escape::quote(&o.to_string()))
                    .collect();
                format!("{}: [{}]", escape::quote(&variable.to_string()), owners.join(", "))
            })
            .collect();
        out.push_str(&format!("seed.hooks({{{}}});\n", hooks.join(", ")));

        for (owner, script) in self.renderers.iter() {
            out.push_str(&format!(
                "seed.renderer({}, async function () {{\n{}}});\n",
                escape::quote(&owner.to_string()),
                script.render()
            ));
        }

        for id in self.dom.walk_depth_first(self.body) {
            let Some(node) = self.dom.get(id) else {
                continue;
            };
            for handler in &node.handlers {
                out.push_str(&format!(
                    "seed.on({}, {}, async function () {{\n{}}}",
                    escape::quote(&node.instance.to_string()),
                    escape::quote(&handler.event),
                    handler.script.render()
                ));
                if let Some(on_error) = &node.on_error {
                    out.push_str(&format!(
                        ", async function (error) {{\n{}}}",
                        on_error.render()
                    ));
                }
                out.push_str(");\n");
            }
        }

        out.push_str("seed.boot();\n");
        out
    }
}

// ===========================================================================
// Tests
// ===========================================================================
