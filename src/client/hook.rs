//! Hook registry: which instances re-render when a variable changes.
//!
//! The registry maps each variable to the ordered list of instances whose
//! render function must run after the variable is written.

use std::collections::BTreeMap;

use crate::id::{InstanceId, VariableId};

use super::value::Value;

/// One registration: re-render `owner` when `variable` changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hook {
    /// The trigger.
    pub variable: VariableId,
    /// The instance whose render function runs.
    pub owner: InstanceId,
}

/// Variable to owners table, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookRegistry {
    by_variable: BTreeMap<VariableId, Vec<InstanceId>>,
}

impl HookRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner` against every leaf of `trigger`.
    ///
    /// Returns how many new registrations were made. Static triggers have
    /// no leaves and register nothing.
    pub fn hook(&mut self, trigger: &Value, owner: InstanceId) -> usize {
        let leaves = trigger.components();
        if leaves.is_empty() {
            tracing::trace!(%owner, "hook on a static value ignored");
            return 0;
        }
        leaves
            .iter()
            .filter(|leaf| self.register(leaf.id(), owner))
            .count()
    }

    /// Register a single pair. Idempotent; returns whether it was new.
    pub fn register(&mut self, variable: VariableId, owner: InstanceId) -> bool {
        let owners = self.by_variable.entry(variable).or_default();
        if owners.contains(&owner) {
            return false;
        }
        owners.push(owner);
        true
    }

    /// Drop every registration owned by `owner`. Returns how many.
    pub fn unregister_owner(&mut self, owner: InstanceId) -> usize {
        let mut removed = 0;
        for owners in self.by_variable.values_mut() {
            let before = owners.len();
            owners.retain(|o| *o != owner);
            removed += before - owners.len();
        }
        self.by_variable.retain(|_, owners| !owners.is_empty());
        removed
    }

    /// Instances to re-render when `variable` changes, in registration order.
    pub fn owners(&self, variable: VariableId) -> &[InstanceId] {
        self.by_variable
            .get(&variable)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Variables `owner` is registered against.
    pub fn triggers_of(&self, owner: InstanceId) -> Vec<VariableId> {
        self.by_variable
            .iter()
            .filter(|(_, owners)| owners.contains(&owner))
            .map(|(variable, _)| *variable)
            .collect()
    }

    /// Every registration, grouped by variable.
    pub fn hooks(&self) -> impl Iterator<Item = Hook> + '_ {
        self.by_variable.iter().flat_map(|(variable, owners)| {
            owners.iter().map(move |owner| Hook {
                variable: *variable,
                owner: *owner,
            })
        })
    }

    /// Variables with at least one registration, ascending.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.by_variable.keys().copied()
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.by_variable.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_variable.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::op;
    use crate::client::variable::{Kind, Literal, Variable};
    use crate::js::Expr;

    fn leaf(n: u64) -> Value {
        Value::Leaf(Variable::new(
            VariableId(n),
            Kind::Bool,
            Literal::zero(Kind::Bool),
            None,
        ))
    }

    #[test]
    fn compound_fans_out_to_each_leaf() {
        let mut hooks = HookRegistry::new();
        let made = hooks.hook(&op::and(leaf(1), leaf(2)), InstanceId(5));
        assert_eq!(made, 2);
        assert_eq!(hooks.owners(VariableId(1)), &[InstanceId(5)]);
        assert_eq!(hooks.owners(VariableId(2)), &[InstanceId(5)]);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut hooks = HookRegistry::new();
        hooks.hook(&leaf(1), InstanceId(2));
        assert_eq!(hooks.hook(&leaf(1), InstanceId(2)), 0);
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn owners_keep_registration_order() {
        let mut hooks = HookRegistry::new();
        hooks.hook(&leaf(1), InstanceId(9));
        hooks.hook(&leaf(1), InstanceId(3));
        hooks.hook(&leaf(1), InstanceId(6));
        assert_eq!(
            hooks.owners(VariableId(1)),
            &[InstanceId(9), InstanceId(3), InstanceId(6)]
        );
    }

    #[test]
    fn static_trigger_is_a_no_op() {
        let mut hooks = HookRegistry::new();
        assert_eq!(hooks.hook(&Value::Static(Expr::bool(true)), InstanceId(1)), 0);
        assert!(hooks.is_empty());
    }

    #[test]
    fn unregister_owner_removes_all_of_its_hooks() {
        let mut hooks = HookRegistry::new();
        hooks.hook(&op::or(leaf(1), leaf(2)), InstanceId(4));
        hooks.hook(&leaf(1), InstanceId(8));
        assert_eq!(hooks.unregister_owner(InstanceId(4)), 2);
        assert_eq!(hooks.owners(VariableId(1)), &[InstanceId(8)]);
        assert!(hooks.owners(VariableId(2)).is_empty());
        assert_eq!(hooks.variables().collect::<Vec<_>>(), vec![VariableId(1)]);
    }

    #[test]
    fn triggers_of_lists_variables() {
        let mut hooks = HookRegistry::new();
        hooks.hook(&op::and(leaf(3), leaf(1)), InstanceId(2));
        assert_eq!(hooks.triggers_of(InstanceId(2)), vec![VariableId(1), VariableId(3)]);
        assert_eq!(hooks.hooks().count(), 2);
    }
}
