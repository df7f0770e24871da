//! Render dispatch: one render function per instance.

use std::collections::BTreeMap;

use crate::id::InstanceId;
use crate::js::{Script, Statement};

/// Statement asking the client to re-run the render function of `id`.
///
/// Unknown or unmounted instances make it a no-op on the client.
pub fn render(id: InstanceId) -> Statement {
    Statement::Render(id)
}

/// Render functions, keyed by owning instance.
///
/// Each owner has a single function; gates and bindings on the same instance
/// append to it in composition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRegistry {
    functions: BTreeMap<InstanceId, Script>,
}

impl RenderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `statement` to the render function of `owner`.
    pub fn append(&mut self, owner: InstanceId, statement: Statement) {
        self.functions.entry(owner).or_default().push(statement);
    }

    /// The render function of `owner`.
    pub fn get(&self, owner: InstanceId) -> Option<&Script> {
        self.functions.get(&owner)
    }

    /// Remove and return the render function of `owner`.
    pub fn remove(&mut self, owner: InstanceId) -> Option<Script> {
        self.functions.remove(&owner)
    }

    /// Every render function, by ascending instance id.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Script)> {
        self.functions.iter().map(|(id, script)| (*id, script))
    }

    /// Number of instances with a render function.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no instance has a render function.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_statement() {
        assert_eq!(render(InstanceId(2)).render(), r#"await seed.render("s2");"#);
    }

    #[test]
    fn append_accumulates_in_order() {
        let mut reg = RenderRegistry::new();
        reg.append(InstanceId(1), Statement::Mount(InstanceId(2)));
        reg.append(InstanceId(1), Statement::Mount(InstanceId(3)));
        let script = reg.get(InstanceId(1)).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.statements()[1], Statement::Mount(InstanceId(3)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_drops_the_function() {
        let mut reg = RenderRegistry::new();
        reg.append(InstanceId(1), Statement::Focus(InstanceId(1)));
        assert!(reg.remove(InstanceId(1)).is_some());
        assert!(reg.is_empty());
        assert!(reg.get(InstanceId(1)).is_none());
    }
}
